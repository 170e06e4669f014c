use chrono::{Duration, NaiveDate, NaiveDateTime};
use fittrack_core::distance::{cumulative_distance_km, segment_km, total_distance_km};
use fittrack_core::models::TrackSample;

fn at(secs: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(7, 0, 0)
        .unwrap()
        + Duration::seconds(secs)
}

fn track(points: &[(f64, f64)]) -> Vec<TrackSample> {
    points
        .iter()
        .enumerate()
        .map(|(i, &(lat, lon))| TrackSample::new(at(i as i64 * 10), lat, lon))
        .collect()
}

#[test]
fn identical_consecutive_points_are_zero() {
    let s = track(&[(10.0, 10.0), (10.0, 10.0)]);
    assert_eq!(total_distance_km(&s), 0.0);
}

#[test]
fn empty_and_single_sample_are_zero() {
    assert_eq!(total_distance_km(&[]), 0.0);
    assert_eq!(total_distance_km(&track(&[(13.75, 100.5)])), 0.0);
}

#[test]
fn hundredth_degree_latitude_is_about_1_1_km() {
    let s = track(&[(13.75, 100.5), (13.76, 100.5)]);
    let d = total_distance_km(&s);
    // meridional arc at ~14°N: ≈ 1.106 km per 0.01°
    assert!((d - 1.106).abs() < 0.005, "got {d}");
}

#[test]
fn sum_does_not_depend_on_accumulation_order() {
    let s = track(&[(13.75, 100.5), (13.76, 100.51), (13.74, 100.49), (13.77, 100.52)]);
    let forward = total_distance_km(&s);
    let backward: f64 = s.windows(2).rev().map(|w| segment_km(&w[0], &w[1])).sum();
    assert!((forward - backward).abs() < 1e-9);
}

#[test]
fn sum_depends_on_sample_order() {
    let a = track(&[(13.75, 100.5), (13.77, 100.5), (13.76, 100.5)]);
    let b = track(&[(13.75, 100.5), (13.76, 100.5), (13.77, 100.5)]);
    let da = total_distance_km(&a);
    let db = total_distance_km(&b);
    // a goes out and back; b is a straight line
    assert!(da > db + 1.0, "da={da} db={db}");
}

#[test]
fn cumulative_distance_is_monotonic_and_ends_at_total() {
    let s = track(&[(13.75, 100.5), (13.76, 100.5), (13.76, 100.5), (13.78, 100.51)]);
    let cum = cumulative_distance_km(&s);
    assert_eq!(cum.len(), s.len());
    assert_eq!(cum[0], 0.0);
    assert!(cum.windows(2).all(|w| w[1] >= w[0]));
    assert_eq!(cum[1], cum[2]);
    assert!((cum[3] - total_distance_km(&s)).abs() < 1e-12);
}
