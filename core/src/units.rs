pub const KMH_TO_MPH: f64 = 0.621371;

// --- RoundTo trait (public, used for reported figures) ---
pub trait RoundTo {
    fn round_to(self, dp: u32) -> f64;
}

impl RoundTo for f64 {
    #[inline]
    fn round_to(self, dp: u32) -> f64 {
        if dp == 0 { return self.round(); }
        let factor = 10_f64.powi(dp as i32);
        (self * factor).round() / factor
    }
}

#[inline]
pub fn kmh_to_mph(speed_kmh: f64) -> f64 {
    speed_kmh * KMH_TO_MPH
}

#[inline]
pub fn mph_to_kmh(speed_mph: f64) -> f64 {
    speed_mph / KMH_TO_MPH
}

/// km/h → m/s
#[inline]
pub fn kmh_to_ms(speed_kmh: f64) -> f64 {
    speed_kmh * 1000.0 / 3600.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_to_half_away_from_zero() {
        assert_eq!(2.345_f64.round_to(0), 2.0);
        assert!((1.23456_f64.round_to(3) - 1.235).abs() < 1e-12);
        assert!((-1.25_f64.round_to(1) + 1.3).abs() < 1e-12);
    }

    #[test]
    fn mph_roundtrip() {
        let kmh = mph_to_kmh(4.0);
        assert!((kmh_to_mph(kmh) - 4.0).abs() < 1e-12);
        assert!((kmh_to_ms(36.0) - 10.0).abs() < 1e-12);
    }
}
