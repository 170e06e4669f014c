use log::warn;
use prometheus::{Encoder, IntCounter, Registry, TextEncoder};

use crate::error::Result;

/// Prometheus counters for one pipeline instance (own registry, no globals).
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    track_cache_hit_total: IntCounter,
    track_cache_miss_total: IntCounter,
    track_loads_total: IntCounter,
    pipeline_runs_total: IntCounter,
    artifact_writes_total: IntCounter,
}

fn counter(registry: &Registry, name: &str, help: &str) -> prometheus::Result<IntCounter> {
    let c = IntCounter::new(name, help)?;
    registry.register(Box::new(c.clone()))?;
    Ok(c)
}

impl Metrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();
        Ok(Self {
            track_cache_hit_total: counter(
                &registry,
                "fittrack_track_cache_hit_total",
                "Coordinate log served from cache",
            )?,
            track_cache_miss_total: counter(
                &registry,
                "fittrack_track_cache_miss_total",
                "Coordinate log not in cache",
            )?,
            track_loads_total: counter(
                &registry,
                "fittrack_track_loads_total",
                "Coordinate log parsed from storage",
            )?,
            pipeline_runs_total: counter(
                &registry,
                "fittrack_pipeline_runs_total",
                "Completed pipeline runs",
            )?,
            artifact_writes_total: counter(
                &registry,
                "fittrack_artifact_writes_total",
                "Route artifacts written",
            )?,
            registry,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Text exposition format of every registered counter.
    pub fn render(&self) -> String {
        let mut buf = Vec::new();
        if let Err(e) = TextEncoder::new().encode(&self.registry.gather(), &mut buf) {
            warn!("metrics: encode failed: {e}");
            return String::new();
        }
        String::from_utf8_lossy(&buf).into_owned()
    }
}

pub fn track_cache_hit_total(m: &Metrics) -> &IntCounter {
    &m.track_cache_hit_total
}

pub fn track_cache_miss_total(m: &Metrics) -> &IntCounter {
    &m.track_cache_miss_total
}

pub fn track_loads_total(m: &Metrics) -> &IntCounter {
    &m.track_loads_total
}

pub fn pipeline_runs_total(m: &Metrics) -> &IntCounter {
    &m.pipeline_runs_total
}

pub fn artifact_writes_total(m: &Metrics) -> &IntCounter {
    &m.artifact_writes_total
}
