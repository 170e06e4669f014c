use std::io::{self, Write};

use crate::models::ActivityResult;
use crate::pipeline::TrackingOutcome;

/// One field per line, as shown on the tracking page.
pub fn format_activity_report(result: &ActivityResult, time_limit: &str) -> String {
    let mut out = String::new();
    out.push_str("--- Activity Report ---\n");
    out.push_str(&format!("Distance: {:.2} km\n", result.distance_km));
    out.push_str(&format!("Steps: {}\n", result.steps));
    out.push_str(&format!("Pace: {}\n", result.pace));
    out.push_str(&format!("Calories: {:.3} kcal\n", result.calories_per_hour));
    out.push_str(&format!("Time limit: {}\n", time_limit));
    out
}

/// Report for a finished run, followed by where its map was written.
pub fn write_activity_report<W: Write>(out: &mut W, outcome: &TrackingOutcome) -> io::Result<()> {
    out.write_all(format_activity_report(&outcome.result, &outcome.time_limit).as_bytes())?;
    writeln!(out, "Map: {}", outcome.artifact_path.display())
}
