use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackError};
use crate::exertion::CalorieStrategy;
use crate::loader::RowPolicy;
use crate::route::{CentroidMode, RouteStyle};

/// Everything the pipeline needs to know up front. Passed to the pipeline
/// constructor; there is no process-wide state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    pub log_path: PathBuf,
    pub artifact_dir: PathBuf,
    pub artifact_stem: String,
    pub centroid: CentroidMode,
    pub calories: CalorieStrategy,
    pub unmatched_rows: RowPolicy,
    pub zoom_start: u8,
    pub line_color: String,
    pub line_weight: u32,
    /// Parse the log once and reuse it; `false` re-reads on every run.
    pub cache_log: bool,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        let style = RouteStyle::default();
        Self {
            log_path: PathBuf::from("coord.csv"),
            artifact_dir: PathBuf::from("templates"),
            artifact_stem: "route_map".to_string(),
            centroid: CentroidMode::FullLog,
            calories: CalorieStrategy::SpeedHeight,
            unmatched_rows: RowPolicy::Fail,
            zoom_start: style.zoom_start,
            line_color: style.line_color,
            line_weight: style.line_weight,
            cache_log: false,
        }
    }
}

impl TrackingConfig {
    /// Reads config from JSON. A missing file gives the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path).map_err(|e| TrackError::io(path, e))?;
            let cfg = Self::from_json(&contents)?;
            info!("config loaded from {} (log={})", path.display(), cfg.log_path.display());
            Ok(cfg)
        } else {
            warn!("no config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn route_style(&self) -> RouteStyle {
        RouteStyle {
            zoom_start: self.zoom_start,
            line_color: self.line_color.clone(),
            line_weight: self.line_weight,
        }
    }
}
