use chrono::{Duration, NaiveDateTime};

use crate::models::{ElapsedDuration, TrackLog, TrackSample};

/// Samples whose timestamp lies in the closed interval `[start, start + span]`.
///
/// `samples` must already be in chronological order; this is not re-checked.
/// A span of zero (or less) yields at most one sample, the first at or after
/// `start`.
pub fn select_from(samples: &[TrackSample], start: NaiveDateTime, span: Duration) -> &[TrackSample] {
    let lo = samples.partition_point(|s| s.timestamp < start);
    if span <= Duration::zero() {
        let hi = (lo + 1).min(samples.len());
        return &samples[lo..hi];
    }
    // An end past chrono's range covers everything after `start`.
    let hi = match start.checked_add_signed(span) {
        Some(end) => lo + samples[lo..].partition_point(|s| s.timestamp <= end),
        None => samples.len(),
    };
    &samples[lo..hi]
}

/// Window starting at the log's first sample and covering `duration`.
/// A duration longer than the log yields the whole log.
pub fn select_window<'a>(log: &'a TrackLog, duration: &ElapsedDuration) -> &'a [TrackSample] {
    match log.start_time() {
        Some(start) => select_from(log.samples(), start, duration.as_chrono()),
        None => &[],
    }
}

/// Span between the first and the last sample ("time limit" shown to the user).
pub fn time_limit(log: &TrackLog) -> Duration {
    match (log.start_time(), log.end_time()) {
        (Some(a), Some(b)) => b - a,
        _ => Duration::zero(),
    }
}

/// `H:MM:SS`, with a `N day(s), ` prefix for spans of a day or more.
pub fn format_time_limit(span: Duration) -> String {
    let total = span.num_seconds().max(0);
    let days = total / 86_400;
    let rest = total % 86_400;
    let hms = format!("{}:{:02}:{:02}", rest / 3600, (rest % 3600) / 60, rest % 60);
    match days {
        0 => hms,
        1 => format!("1 day, {hms}"),
        n => format!("{n} days, {hms}"),
    }
}
