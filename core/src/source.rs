use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use log::debug;

use crate::error::Result;
use crate::loader::TrackLoader;
use crate::metrics::{track_cache_hit_total, track_cache_miss_total, track_loads_total, Metrics};
use crate::models::TrackLog;

/// Where the pipeline gets its coordinate log from.
pub trait TrackSource: Send + Sync {
    fn load(&self, path: &Path) -> Result<Arc<TrackLog>>;
}

/// Parses the log from storage on every call.
pub struct FileTrackSource {
    loader: TrackLoader,
    metrics: Arc<Metrics>,
}

impl FileTrackSource {
    pub fn new(loader: TrackLoader, metrics: Arc<Metrics>) -> Self {
        Self { loader, metrics }
    }
}

impl TrackSource for FileTrackSource {
    fn load(&self, path: &Path) -> Result<Arc<TrackLog>> {
        let log = self.loader.load_path(path)?;
        track_loads_total(&self.metrics).inc();
        Ok(Arc::new(log))
    }
}

/// Load-once source: the first call per path parses the file, later calls
/// share the same `Arc<TrackLog>`.
pub struct CachedTrackSource {
    inner: FileTrackSource,
    cache: Arc<Mutex<HashMap<PathBuf, Arc<TrackLog>>>>,
}

impl CachedTrackSource {
    pub fn new(loader: TrackLoader, metrics: Arc<Metrics>) -> Self {
        Self {
            inner: FileTrackSource::new(loader, metrics),
            cache: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Drop a cached log, e.g. after the file was replaced.
    pub fn invalidate(&self, path: &Path) -> bool {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        cache.remove(path).is_some()
    }

    pub fn cached_paths(&self) -> usize {
        self.cache.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl TrackSource for CachedTrackSource {
    fn load(&self, path: &Path) -> Result<Arc<TrackLog>> {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(log) = cache.get(path) {
            track_cache_hit_total(&self.inner.metrics).inc();
            return Ok(Arc::clone(log));
        }

        track_cache_miss_total(&self.inner.metrics).inc();
        let log = self.inner.load(path)?;
        debug!("caching coordinate log {}", path.display());
        cache.insert(path.to_path_buf(), Arc::clone(&log));
        Ok(log)
    }
}
