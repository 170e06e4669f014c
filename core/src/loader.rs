// core/src/loader.rs
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, TrackError};
use crate::models::{TrackLog, TrackSample};

// Fallback patterns for free-text cells such as `{"lat":13.75` or `lon:100.52}`.
static LAT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"lat"?\s*:\s*(-?\d+(?:\.\d+)?)"#).expect("valid lat pattern"));
static LON_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"lon"?\s*:\s*(-?\d+(?:\.\d+)?)"#).expect("valid lon pattern"));

/// What to do with a row whose latitude/longitude cell cannot be decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowPolicy {
    #[default]
    Fail,
    SkipAndWarn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateField {
    Latitude,
    Longitude,
}

impl CoordinateField {
    fn key(self) -> &'static str {
        match self {
            CoordinateField::Latitude => "lat",
            CoordinateField::Longitude => "lon",
        }
    }

    fn pattern(self) -> &'static Regex {
        match self {
            CoordinateField::Latitude => &LAT_PATTERN,
            CoordinateField::Longitude => &LON_PATTERN,
        }
    }
}

/// How a coordinate cell was decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellDecode {
    /// Plain numeric cell.
    Number,
    /// JSON object cell, e.g. `{"lat": 13.75}`.
    Object,
    /// Free-text cell matched by `key:<number>`.
    Pattern,
}

/// Per-form counts of decoded cells for one load, plus skipped rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeStats {
    pub number: usize,
    pub object: usize,
    pub pattern: usize,
    pub skipped: usize,
}

impl DecodeStats {
    fn record(&mut self, how: CellDecode) {
        match how {
            CellDecode::Number => self.number += 1,
            CellDecode::Object => self.object += 1,
            CellDecode::Pattern => self.pattern += 1,
        }
    }
}

/// Decode one coordinate cell. Structured forms are tried first; the
/// `key:<number>` pattern is the explicit fallback for free-text cells.
pub fn decode_coordinate(cell: &str, field: CoordinateField) -> Option<(f64, CellDecode)> {
    let cell = cell.trim();

    if let Ok(v) = cell.parse::<f64>() {
        if v.is_finite() {
            return Some((v, CellDecode::Number));
        }
    }

    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(cell) {
        if let Some(v) = map.get(field.key()).and_then(Value::as_f64) {
            return Some((v, CellDecode::Object));
        }
    }

    field
        .pattern()
        .captures(cell)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .map(|v| (v, CellDecode::Pattern))
}

/// Parse `<date>T<time>`. Only the first 8 characters of the time part
/// (`HH:MM:SS`) count; fractions and zone suffixes are dropped.
pub fn parse_timestamp(token: &str) -> Option<NaiveDateTime> {
    let (date, time) = token.trim().split_once('T')?;
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    let time = NaiveTime::parse_from_str(time.get(..8)?, "%H:%M:%S").ok()?;
    Some(date.and_time(time))
}

/// Reads a tabular coordinate log: column 0 is the timestamp, plus columns
/// headed `lat` and `lon`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrackLoader {
    policy: RowPolicy,
}

impl TrackLoader {
    pub fn new(policy: RowPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> RowPolicy {
        self.policy
    }

    pub fn load_path(&self, path: &Path) -> Result<TrackLog> {
        let file = File::open(path).map_err(|e| TrackError::io(path, e))?;
        let log = self.load_reader(file)?;
        debug!("loaded {} samples from {}", log.len(), path.display());
        Ok(log)
    }

    pub fn load_reader<R: Read>(&self, reader: R) -> Result<TrackLog> {
        let (log, stats) = self.load_reader_with_stats(reader)?;
        debug!(
            "coordinate cells: {} numeric, {} object, {} pattern",
            stats.number, stats.object, stats.pattern
        );
        Ok(log)
    }

    /// Like `load_reader`, also reporting how the coordinate cells were decoded.
    pub fn load_reader_with_stats<R: Read>(&self, reader: R) -> Result<(TrackLog, DecodeStats)> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| TrackError::MissingColumn(name.to_string()))
        };
        let lat_col = column("lat")?;
        let lon_col = column("lon")?;

        let mut samples = Vec::new();
        let mut stats = DecodeStats::default();

        for (idx, record) in rdr.records().enumerate() {
            let record = record?;
            let line = record
                .position()
                .map(|p| p.line())
                .unwrap_or(idx as u64 + 2);

            let token = record.get(0).unwrap_or_default();
            let timestamp = parse_timestamp(token)
                .ok_or_else(|| TrackError::parse(line, format!("malformed timestamp '{token}'")))?;

            let lat = record
                .get(lat_col)
                .and_then(|c| decode_coordinate(c, CoordinateField::Latitude));
            let lon = record
                .get(lon_col)
                .and_then(|c| decode_coordinate(c, CoordinateField::Longitude));

            match (lat, lon) {
                (Some((lat, lat_how)), Some((lon, lon_how))) => {
                    stats.record(lat_how);
                    stats.record(lon_how);
                    samples.push(TrackSample::new(timestamp, lat, lon));
                }
                _ => {
                    let reason = format!(
                        "unmatched coordinate (lat='{}', lon='{}')",
                        record.get(lat_col).unwrap_or_default(),
                        record.get(lon_col).unwrap_or_default()
                    );
                    match self.policy {
                        RowPolicy::Fail => return Err(TrackError::parse(line, reason)),
                        RowPolicy::SkipAndWarn => {
                            warn!("skipping line {line}: {reason}");
                            stats.skipped += 1;
                        }
                    }
                }
            }
        }

        if stats.skipped > 0 {
            warn!("{} row(s) skipped while loading coordinate log", stats.skipped);
        }
        Ok((TrackLog::new(samples), stats))
    }
}
