// core/src/exertion.rs
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{Gender, UserProfile};
use crate::units::{kmh_to_mph, kmh_to_ms};

/// Average daily calorie need used to scale the MET estimate.
pub const REFERENCE_DAILY_KCAL: f64 = 2000.0;

pub const MET_LIGHT_WALK: f64 = 2.0;
pub const MET_BRISK_WALK: f64 = 4.5;
pub const MET_LIGHT_RUN: f64 = 8.0;
pub const MET_FAST_RUN: f64 = 11.5;

/// MET tier from speed in mph.
///
/// Speeds in [2, 3.5) mph have no tier of their own and land in the fast-run
/// tier (11.5). This is kept as-is; see `met_tier_gap` in the tests.
/// NaN and negative speeds count as standing still; `+inf` saturates to the
/// fast-run tier.
pub fn met_from_mph(speed_mph: f64) -> f64 {
    let mph = if speed_mph.is_nan() { 0.0 } else { speed_mph.max(0.0) };
    if mph < 2.0 {
        MET_LIGHT_WALK
    } else if (3.5..5.0).contains(&mph) {
        MET_BRISK_WALK
    } else if (5.0..7.0).contains(&mph) {
        MET_LIGHT_RUN
    } else {
        if mph < 3.5 {
            warn!("speed {mph:.2} mph falls between MET tiers, using fast-run tier");
        }
        MET_FAST_RUN
    }
}

/// MET tier from speed in km/h. Negative or NaN speed counts as 0.
pub fn met(speed_kmh: f64) -> f64 {
    met_from_mph(kmh_to_mph(speed_kmh))
}

/// Basal metabolic rate (kcal/day), revised Harris-Benedict.
pub fn bmr(gender: Gender, weight_kg: f64, height_cm: f64, age: u32) -> f64 {
    let age = f64::from(age);
    match gender {
        Gender::Male => 88.362 + (13.397 * weight_kg) + (4.799 * height_cm) - (5.677 * age),
        Gender::Female => 447.593 + (9.247 * weight_kg) + (3.098 * height_cm) - (4.330 * age),
    }
}

/// BMR from a stored profile; an unknown gender is `InvalidArgument`.
pub fn bmr_for(profile: &UserProfile) -> Result<f64> {
    let gender = profile.gender()?;
    Ok(bmr(gender, profile.weight_kg, profile.height_cm, profile.age))
}

/// Estimator A: MET · weight · hours, scaled by BMR against a 2000 kcal day.
pub fn calories_met_bmr(met: f64, weight_kg: f64, minutes: f64, bmr: f64) -> f64 {
    met * weight_kg * (minutes / 60.0) * (bmr / REFERENCE_DAILY_KCAL)
}

/// Estimator B: (0.035·weight + v²/height) · 0.029 · weight · minutes, v in m/s.
pub fn calories_speed_height(weight_kg: f64, height_cm: f64, speed_kmh: f64, minutes: f64) -> f64 {
    let v = kmh_to_ms(speed_kmh);
    ((0.035 * weight_kg) + (v.powi(2) / height_cm)) * 0.029 * weight_kg * minutes
}

/// Which energy estimator the caller wants reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalorieStrategy {
    MetBmrScaled,
    #[default]
    SpeedHeight,
}

#[derive(Debug, Clone, Copy)]
pub struct EnergyInputs {
    pub gender: Gender,
    pub age: u32,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub met: f64,
    pub speed_kmh: f64,
    pub minutes: f64,
}

impl CalorieStrategy {
    pub fn estimate(&self, inp: &EnergyInputs) -> f64 {
        let kcal = match self {
            CalorieStrategy::MetBmrScaled => {
                let b = bmr(inp.gender, inp.weight_kg, inp.height_cm, inp.age);
                calories_met_bmr(inp.met, inp.weight_kg, inp.minutes, b)
            }
            CalorieStrategy::SpeedHeight => {
                calories_speed_height(inp.weight_kg, inp.height_cm, inp.speed_kmh, inp.minutes)
            }
        };
        debug!("calories ({self:?}) = {kcal:.3}");
        if kcal.is_finite() { kcal.max(0.0) } else { 0.0 }
    }
}
