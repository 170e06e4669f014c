//! Activity-track analytics: coordinate log → time window → distance, MET,
//! calories, steps and a route map.

pub mod api;
pub mod config;
pub mod distance;
pub mod error;
pub mod exertion;
pub mod loader;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod route;
pub mod source;
pub mod storage;
pub mod stride;
pub mod units;
pub mod window;

#[cfg(feature = "python")]
mod py;

pub use api::{compute_activity_json, time_limit_json};
pub use config::TrackingConfig;
pub use distance::total_distance_km;
pub use error::{Result, TrackError};
pub use exertion::{bmr, bmr_for, met, met_from_mph, CalorieStrategy};
pub use loader::{RowPolicy, TrackLoader};
pub use models::{ActivityResult, ElapsedDuration, Gender, Pace, TrackLog, TrackSample, UserProfile};
pub use pipeline::{analyze_window, ActivityRequest, TrackingOutcome, TrackingPipeline};
pub use route::{ArtifactSink, CentroidMode, HtmlMapSink, RouteArtifact, RouteRenderer};
pub use source::{CachedTrackSource, FileTrackSource, TrackSource};
pub use storage::ProfileStore;
pub use stride::{pace, step_count, stride_length_cm};
pub use units::RoundTo;
pub use window::{select_window, time_limit};
