// core/src/route.rs
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use geo::{Centroid, MultiPoint, Point};
use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackError};
use crate::metrics::{artifact_writes_total, Metrics};
use crate::models::{TrackLog, TrackSample};

/// Which samples the map centre is averaged over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CentroidMode {
    /// Mean of the whole log, even though only the window is drawn.
    #[default]
    FullLog,
    Window,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStyle {
    pub zoom_start: u8,
    pub line_color: String,
    pub line_weight: u32,
}

impl Default for RouteStyle {
    fn default() -> Self {
        Self { zoom_start: 15, line_color: "blue".to_string(), line_weight: 4 }
    }
}

/// Map centre plus the drawn path, both as `[lat, lon]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteArtifact {
    pub center: [f64; 2],
    pub path: Vec<[f64; 2]>,
    pub style: RouteStyle,
}

/// Arithmetic mean of latitude/longitude.
pub fn mean_position(samples: &[TrackSample]) -> Option<[f64; 2]> {
    let mp: MultiPoint<f64> = samples
        .iter()
        .map(|s| Point::new(s.longitude, s.latitude))
        .collect::<Vec<_>>()
        .into();
    mp.centroid().map(|c| [c.y(), c.x()])
}

#[derive(Debug, Clone, Default)]
pub struct RouteRenderer {
    pub centroid: CentroidMode,
    pub style: RouteStyle,
}

impl RouteRenderer {
    pub fn new(centroid: CentroidMode, style: RouteStyle) -> Self {
        Self { centroid, style }
    }

    /// `None` when there is nothing to centre the map on.
    pub fn build(&self, log: &TrackLog, window: &[TrackSample]) -> Option<RouteArtifact> {
        let center = match self.centroid {
            CentroidMode::FullLog => mean_position(log.samples())?,
            CentroidMode::Window => mean_position(window)?,
        };
        Some(RouteArtifact {
            center,
            path: window.iter().map(|s| [s.latitude, s.longitude]).collect(),
            style: self.style.clone(),
        })
    }
}

/// Leaflet page with a single polyline.
pub fn render_html(artifact: &RouteArtifact) -> Result<String> {
    let center = serde_json::to_string(&artifact.center)?;
    let path = serde_json::to_string(&artifact.path)?;
    let color = serde_json::to_string(&artifact.style.line_color)?;
    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8" />
<meta name="viewport" content="width=device-width, initial-scale=1.0" />
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css" />
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<style>html, body, #map {{ height: 100%; margin: 0; }}</style>
</head>
<body>
<div id="map"></div>
<script>
var map = L.map("map").setView({center}, {zoom});
L.tileLayer("https://{{s}}.tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png", {{
  maxZoom: 19,
  attribution: "&copy; OpenStreetMap contributors"
}}).addTo(map);
L.polyline({path}, {{ color: {color}, weight: {weight} }}).addTo(map);
</script>
</body>
</html>
"#,
        zoom = artifact.style.zoom_start,
        weight = artifact.style.line_weight,
    ))
}

/// Receives finished artifacts; returns where the artifact can be served from.
pub trait ArtifactSink: Send + Sync {
    fn publish(&self, session_id: &str, artifact: &RouteArtifact) -> Result<PathBuf>;
}

/// Keep `[A-Za-z0-9_-]`, replace anything else.
pub fn sanitize_session_id(session_id: &str) -> String {
    let s: String = session_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if s.is_empty() { "anonymous".to_string() } else { s }
}

/// Writes one HTML map per session: `<dir>/<stem>_<session>.html`.
/// Files are written to a temp name and renamed, so a reader sees either the
/// old map or the new one.
pub struct HtmlMapSink {
    dir: PathBuf,
    stem: String,
    metrics: Arc<Metrics>,
}

impl HtmlMapSink {
    pub fn new(dir: impl Into<PathBuf>, stem: impl Into<String>, metrics: Arc<Metrics>) -> Self {
        Self { dir: dir.into(), stem: stem.into(), metrics }
    }

    pub fn path_for(&self, session_id: &str) -> PathBuf {
        self.dir
            .join(format!("{}_{}.html", self.stem, sanitize_session_id(session_id)))
    }
}

static TMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Temp file next to `path`, unique per write so concurrent publishes to the
/// same session never share one.
fn temp_path(path: &Path) -> PathBuf {
    let seq = TMP_SEQ.fetch_add(1, Ordering::Relaxed);
    let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    path.with_file_name(format!(".{name}.{}.{seq}.tmp", std::process::id()))
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let tmp = temp_path(path);
    fs::write(&tmp, contents).map_err(|e| TrackError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| TrackError::io(path, e))
}

impl ArtifactSink for HtmlMapSink {
    fn publish(&self, session_id: &str, artifact: &RouteArtifact) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(|e| TrackError::io(&self.dir, e))?;
        let path = self.path_for(session_id);
        let html = render_html(artifact)?;
        write_atomic(&path, &html)?;
        artifact_writes_total(&self.metrics).inc();
        info!("route map written to {} ({} points)", path.display(), artifact.path.len());
        Ok(path)
    }
}
