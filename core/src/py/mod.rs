use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::wrap_pyfunction;

use crate::api::{compute_activity_json, time_limit_json};
use crate::config::TrackingConfig;
use crate::pipeline::TrackingPipeline;

// ──────────────────────────────────────────────────────────────────────────────
// Tracker: one pipeline per web process, shared between requests
// ──────────────────────────────────────────────────────────────────────────────

#[pyclass]
struct Tracker {
    pipeline: TrackingPipeline,
}

#[pymethods]
impl Tracker {
    /// `config_json` is a TrackingConfig object; missing keys take defaults.
    #[new]
    #[pyo3(signature = (config_json=None))]
    fn new(config_json: Option<&str>) -> PyResult<Self> {
        let config = match config_json {
            Some(s) => TrackingConfig::from_json(s).map_err(|e| PyValueError::new_err(e.to_string()))?,
            None => TrackingConfig::default(),
        };
        let pipeline = TrackingPipeline::new(config).map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(Self { pipeline })
    }

    /// Request JSON in, ActivityResult JSON out.
    fn compute(&self, py: Python<'_>, request_json: &str) -> PyResult<String> {
        let req = request_json.to_owned();
        let pipeline = &self.pipeline;
        py.allow_threads(move || compute_activity_json(pipeline, &req))
            .map_err(PyValueError::new_err)
    }

    fn time_limit(&self) -> PyResult<String> {
        time_limit_json(&self.pipeline).map_err(PyValueError::new_err)
    }

    fn metrics(&self) -> String {
        self.pipeline.metrics().render()
    }
}

/// Stateless variant: builds a pipeline from config on every call.
#[pyfunction]
fn compute_activity(config_json: &str, request_json: &str) -> PyResult<String> {
    let config = TrackingConfig::from_json(config_json).map_err(|e| PyValueError::new_err(e.to_string()))?;
    let pipeline = TrackingPipeline::new(config).map_err(|e| PyValueError::new_err(e.to_string()))?;
    compute_activity_json(&pipeline, request_json).map_err(PyValueError::new_err)
}

// ──────────────────────────────────────────────────────────────────────────────
// PyO3-MODULE
// ──────────────────────────────────────────────────────────────────────────────

#[pymodule]
fn fittrack_core(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<Tracker>()?;
    m.add_function(wrap_pyfunction!(compute_activity, m)?)?;
    Ok(())
}
