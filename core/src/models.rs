use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::TrackError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackSample {
    pub timestamp: NaiveDateTime, // second precision
    pub latitude: f64,            // degrees
    pub longitude: f64,           // degrees
}

impl TrackSample {
    pub fn new(timestamp: NaiveDateTime, latitude: f64, longitude: f64) -> Self {
        Self { timestamp, latitude, longitude }
    }
}

/// Ordered position-over-time series. Immutable once loaded; the loader keeps
/// the row order of the source file and never re-sorts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackLog {
    samples: Vec<TrackSample>,
}

impl TrackLog {
    pub fn new(samples: Vec<TrackSample>) -> Self {
        Self { samples }
    }

    pub fn samples(&self) -> &[TrackSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Timestamp of the first sample; the start of every requested window.
    pub fn start_time(&self) -> Option<NaiveDateTime> {
        self.samples.first().map(|s| s.timestamp)
    }

    pub fn end_time(&self) -> Option<NaiveDateTime> {
        self.samples.last().map(|s| s.timestamp)
    }
}

/// Duration declared by the user, as three separate non-negative fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElapsedDuration {
    #[serde(default, alias = "hour", alias = "h")]
    pub hours: u32,
    #[serde(default, alias = "minute", alias = "m")]
    pub minutes: u32,
    #[serde(default, alias = "second", alias = "s")]
    pub seconds: u32,
}

impl ElapsedDuration {
    pub fn new(hours: u32, minutes: u32, seconds: u32) -> Self {
        Self { hours, minutes, seconds }
    }

    pub fn total_seconds(&self) -> u64 {
        u64::from(self.hours) * 3600 + u64::from(self.minutes) * 60 + u64::from(self.seconds)
    }

    /// h*60 + m + s/60
    pub fn total_minutes(&self) -> f64 {
        self.total_seconds() as f64 / 60.0
    }

    pub fn total_hours(&self) -> f64 {
        self.total_seconds() as f64 / 3600.0
    }

    pub fn is_zero(&self) -> bool {
        self.total_seconds() == 0
    }

    pub fn as_chrono(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.total_seconds() as i64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl FromStr for Gender {
    type Err = TrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Male" => Ok(Gender::Male),
            "Female" => Ok(Gender::Female),
            other => Err(TrackError::InvalidArgument(format!(
                "invalid gender '{other}', expected 'Male' or 'Female'"
            ))),
        }
    }
}

/// Profile fields as the storage layer keeps them. Gender stays a raw string
/// so an unexpected value surfaces as `InvalidArgument` when it is used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub gender: String,
    pub age: u32,
    #[serde(alias = "weight", alias = "weightKg")]
    pub weight_kg: f64,
    #[serde(alias = "height", alias = "heightCm")]
    pub height_cm: f64,
}

impl UserProfile {
    pub fn new(gender: Gender, age: u32, weight_kg: f64, height_cm: f64) -> Self {
        let gender = match gender {
            Gender::Male => "Male",
            Gender::Female => "Female",
        };
        Self { gender: gender.to_string(), age, weight_kg, height_cm }
    }

    pub fn gender(&self) -> Result<Gender, TrackError> {
        self.gender.parse()
    }
}

/// Coarse exertion bucket derived from MET.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pace {
    Slow,
    Moderate,
    Brisk,
}

impl fmt::Display for Pace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Pace::Slow => "Slow",
            Pace::Moderate => "Moderate",
            Pace::Brisk => "Brisk",
        };
        f.write_str(s)
    }
}

/// The only output of one pipeline run. Built fresh per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityResult {
    pub distance_km: f64,      // 2 dp
    pub steps: u64,
    pub pace: Pace,
    pub calories_per_hour: f64, // 3 dp
}
