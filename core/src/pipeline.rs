// core/src/pipeline.rs
use std::path::PathBuf;
use std::sync::Arc;

use log::{debug, info};

use crate::config::TrackingConfig;
use crate::distance::total_distance_km;
use crate::error::{Result, TrackError};
use crate::exertion::{met, CalorieStrategy, EnergyInputs};
use crate::loader::TrackLoader;
use crate::metrics::{pipeline_runs_total, Metrics};
use crate::models::{ActivityResult, ElapsedDuration, TrackLog, TrackSample, UserProfile};
use crate::route::{ArtifactSink, HtmlMapSink, RouteArtifact, RouteRenderer};
use crate::source::{CachedTrackSource, FileTrackSource, TrackSource};
use crate::stride::{pace, step_count, stride_length_cm};
use crate::units::RoundTo;
use crate::window::{format_time_limit, select_window, time_limit};

#[derive(Debug, Clone)]
pub struct ActivityRequest {
    pub session_id: String,
    pub duration: ElapsedDuration,
    pub profile: UserProfile,
}

#[derive(Debug, Clone)]
pub struct TrackingOutcome {
    pub result: ActivityResult,
    pub artifact: RouteArtifact,
    pub artifact_path: PathBuf,
    /// `H:MM:SS` span of the whole log.
    pub time_limit: String,
}

/// Speed (km/h) and MET for a window. A zero duration gives (0, 0) instead
/// of dividing by zero.
pub fn speed_and_met(distance_km: f64, duration: &ElapsedDuration) -> (f64, f64) {
    if duration.is_zero() {
        return (0.0, 0.0);
    }
    let speed_kmh = distance_km / duration.total_hours();
    (speed_kmh, met(speed_kmh))
}

fn check_profile(profile: &UserProfile) -> Result<()> {
    if !(profile.height_cm.is_finite() && profile.height_cm > 0.0) {
        return Err(TrackError::InvalidArgument(format!(
            "height_cm must be positive, got {}",
            profile.height_cm
        )));
    }
    if !(profile.weight_kg.is_finite() && profile.weight_kg >= 0.0) {
        return Err(TrackError::InvalidArgument(format!(
            "weight_kg must be non-negative, got {}",
            profile.weight_kg
        )));
    }
    Ok(())
}

/// Distance, pace, steps and calories for an already selected window.
pub fn analyze_window(
    window: &[TrackSample],
    duration: &ElapsedDuration,
    profile: &UserProfile,
    strategy: CalorieStrategy,
) -> Result<ActivityResult> {
    let gender = profile.gender()?;
    check_profile(profile)?;

    // Speed is derived from the reported (2 dp) distance.
    let distance_km = total_distance_km(window).round_to(2);
    let (speed_kmh, met) = speed_and_met(distance_km, duration);

    let calories = strategy.estimate(&EnergyInputs {
        gender,
        age: profile.age,
        weight_kg: profile.weight_kg,
        height_cm: profile.height_cm,
        met,
        speed_kmh,
        minutes: duration.total_minutes(),
    });

    let pace = pace(met);
    let stride_cm = stride_length_cm(gender, pace, profile.height_cm);
    let steps = step_count(distance_km, stride_cm);

    debug!(
        "window: {} samples, {distance_km:.2} km, {speed_kmh:.3} km/h, MET {met}, stride {stride_cm:.3} cm",
        window.len()
    );

    Ok(ActivityResult {
        distance_km,
        steps,
        pace,
        calories_per_hour: calories.round_to(3),
    })
}

/// Load → window → distance/route → MET → calories/steps, one request at a time.
/// Safe to share between threads; each session gets its own artifact file.
pub struct TrackingPipeline {
    config: TrackingConfig,
    source: Box<dyn TrackSource>,
    sink: Box<dyn ArtifactSink>,
    renderer: RouteRenderer,
    metrics: Arc<Metrics>,
}

impl TrackingPipeline {
    /// File-backed source (cached when `config.cache_log`) and HTML map sink.
    pub fn new(config: TrackingConfig) -> Result<Self> {
        let metrics = Arc::new(Metrics::new()?);
        let loader = TrackLoader::new(config.unmatched_rows);
        let source: Box<dyn TrackSource> = if config.cache_log {
            Box::new(CachedTrackSource::new(loader, Arc::clone(&metrics)))
        } else {
            Box::new(FileTrackSource::new(loader, Arc::clone(&metrics)))
        };
        let sink = Box::new(HtmlMapSink::new(
            config.artifact_dir.clone(),
            config.artifact_stem.clone(),
            Arc::clone(&metrics),
        ));
        Ok(Self::with_parts(config, source, sink, metrics))
    }

    pub fn with_parts(
        config: TrackingConfig,
        source: Box<dyn TrackSource>,
        sink: Box<dyn ArtifactSink>,
        metrics: Arc<Metrics>,
    ) -> Self {
        let renderer = RouteRenderer::new(config.centroid, config.route_style());
        Self { config, source, sink, renderer, metrics }
    }

    pub fn config(&self) -> &TrackingConfig {
        &self.config
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    fn load_log(&self) -> Result<Arc<TrackLog>> {
        let log = self.source.load(&self.config.log_path)?;
        if log.is_empty() {
            return Err(TrackError::EmptyLog(self.config.log_path.clone()));
        }
        Ok(log)
    }

    /// Span of the configured log (longest duration worth requesting).
    pub fn time_limit(&self) -> Result<chrono::Duration> {
        let log = self.load_log()?;
        Ok(time_limit(&log))
    }

    pub fn run(&self, request: &ActivityRequest) -> Result<TrackingOutcome> {
        let log = self.load_log()?;
        let window = select_window(&log, &request.duration);

        let result = analyze_window(window, &request.duration, &request.profile, self.config.calories)?;

        let artifact = self
            .renderer
            .build(&log, window)
            .ok_or_else(|| TrackError::EmptyLog(self.config.log_path.clone()))?;
        let artifact_path = self.sink.publish(&request.session_id, &artifact)?;

        pipeline_runs_total(&self.metrics).inc();
        info!(
            "session {}: {:.2} km, {} steps, {}, {:.3} kcal",
            request.session_id, result.distance_km, result.steps, result.pace, result.calories_per_hour
        );

        Ok(TrackingOutcome {
            result,
            artifact,
            artifact_path,
            time_limit: format_time_limit(time_limit(&log)),
        })
    }
}
