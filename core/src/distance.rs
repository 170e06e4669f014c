use geo::{point, GeodesicDistance};

use crate::models::TrackSample;

/// Ellipsoidal (WGS84) distance between two samples, in kilometres.
pub fn segment_km(a: &TrackSample, b: &TrackSample) -> f64 {
    if a.latitude == b.latitude && a.longitude == b.longitude {
        return 0.0;
    }
    let pa = point!(x: a.longitude, y: a.latitude);
    let pb = point!(x: b.longitude, y: b.latitude);
    let m = pa.geodesic_distance(&pb);
    if m.is_finite() { m.max(0.0) / 1000.0 } else { 0.0 }
}

/// Sum of consecutive segment lengths along the recorded trajectory.
/// Fewer than two samples gives 0.
pub fn total_distance_km(samples: &[TrackSample]) -> f64 {
    samples.windows(2).map(|w| segment_km(&w[0], &w[1])).sum()
}

/// Running distance at each sample (first entry is 0).
pub fn cumulative_distance_km(samples: &[TrackSample]) -> Vec<f64> {
    let mut out = Vec::with_capacity(samples.len());
    let mut acc = 0.0;
    for (i, s) in samples.iter().enumerate() {
        if i > 0 {
            acc += segment_km(&samples[i - 1], s);
        }
        out.push(acc);
    }
    out
}
