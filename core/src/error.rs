use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the tracking core. Nothing here is retried: the same
/// inputs always produce the same failure.
#[derive(Debug, Error)]
pub enum TrackError {
    /// Malformed timestamp or an unmatched coordinate cell in the log.
    #[error("parse error at line {line}: {reason}")]
    Parse { line: u64, reason: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("coordinate log has no column named '{0}'")]
    MissingColumn(String),

    #[error("coordinate log {0} contains no samples")]
    EmptyLog(PathBuf),

    #[error("i/o failure on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("metrics registry: {0}")]
    Metrics(#[from] prometheus::Error),
}

impl TrackError {
    pub(crate) fn parse(line: u64, reason: impl Into<String>) -> Self {
        TrackError::Parse {
            line,
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TrackError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, TrackError>;
