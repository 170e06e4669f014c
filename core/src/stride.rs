use crate::models::{Gender, Pace};
use crate::units::RoundTo;

pub const STRIDE_FACTOR_MALE: f64 = 0.413;
pub const STRIDE_FACTOR_OTHER: f64 = 0.415;
pub const MODERATE_MULTIPLIER: f64 = 1.5;
pub const BRISK_MULTIPLIER: f64 = 1.95;

/// Pace bucket. The input is the MET value, not a speed.
pub fn pace(met: f64) -> Pace {
    if met < 5.6 {
        Pace::Slow
    } else if met < 7.2 {
        Pace::Moderate
    } else {
        Pace::Brisk
    }
}

pub fn stride_length_cm(gender: Gender, pace: Pace, height_cm: f64) -> f64 {
    let factor = match gender {
        Gender::Male => STRIDE_FACTOR_MALE,
        _ => STRIDE_FACTOR_OTHER,
    };
    let stride = height_cm * factor;
    match pace {
        Pace::Slow => stride,
        Pace::Moderate => stride * MODERATE_MULTIPLIER,
        Pace::Brisk => stride * BRISK_MULTIPLIER,
    }
}

/// distance / stride, rounded to 1 dp. A non-positive stride gives 0.
pub fn steps_exact(distance_km: f64, stride_cm: f64) -> f64 {
    if stride_cm.is_nan() || stride_cm <= 0.0 || !distance_km.is_finite() {
        return 0.0;
    }
    (distance_km.max(0.0) * 1000.0 / (stride_cm / 100.0)).round_to(1)
}

/// Reported step count: `steps_exact` rounded to the nearest integer,
/// halves to even (3448.5 -> 3448, 3449.5 -> 3450).
pub fn step_count(distance_km: f64, stride_cm: f64) -> u64 {
    steps_exact(distance_km, stride_cm).round_ties_even() as u64
}
