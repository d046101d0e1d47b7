//! Distance-to-fill-percentage conversion.
//!
//! Each tank is calibrated by two distances measured from the sensor to
//! the water surface: `min_cm` (tank full) and `max_cm` (tank empty).
//! The mapping is inverted and clamped — a shorter echo means a fuller
//! tank, and readings outside the calibrated band saturate at 0 or 100.

use serde::{Deserialize, Serialize};

/// Per-tank calibration pair. Fixed configuration, not runtime-mutable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TankCalibration {
    /// Distance (cm) from sensor to water surface when the tank is full.
    pub min_cm: f32,
    /// Distance (cm) from sensor to water surface when the tank is empty.
    pub max_cm: f32,
}

impl TankCalibration {
    /// Calibrated span in centimeters.
    pub fn span_cm(&self) -> f32 {
        self.max_cm - self.min_cm
    }
}

/// Map a measured distance onto a fill percentage in `[0, 100]`.
///
/// Monotonically non-increasing in `distance_cm`:
/// `to_percent(min_cm) == 100`, `to_percent(max_cm) == 0`, everything
/// outside the band clamps.
pub fn to_percent(distance_cm: f32, cal: &TankCalibration) -> u8 {
    let span = cal.span_cm();
    if span <= 0.0 {
        // Degenerate calibration; report empty rather than divide by zero.
        return 0;
    }
    let fraction = (cal.max_cm - distance_cm) / span;
    (fraction * 100.0).clamp(0.0, 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAL: TankCalibration = TankCalibration {
        min_cm: 20.0,
        max_cm: 165.0,
    };

    #[test]
    fn full_tank_is_100() {
        assert_eq!(to_percent(CAL.min_cm, &CAL), 100);
    }

    #[test]
    fn empty_tank_is_0() {
        assert_eq!(to_percent(CAL.max_cm, &CAL), 0);
    }

    #[test]
    fn clamps_below_min() {
        assert_eq!(to_percent(3.0, &CAL), 100);
        assert_eq!(to_percent(0.0, &CAL), 100);
    }

    #[test]
    fn clamps_above_max() {
        assert_eq!(to_percent(300.0, &CAL), 0);
        assert_eq!(to_percent(400.0, &CAL), 0);
    }

    #[test]
    fn midpoint_is_half() {
        let mid = (CAL.min_cm + CAL.max_cm) / 2.0;
        let p = to_percent(mid, &CAL);
        assert!((49..=51).contains(&p), "midpoint gave {}", p);
    }

    #[test]
    fn monotonic_non_increasing() {
        let mut last = 100;
        let mut d = CAL.min_cm;
        while d <= CAL.max_cm {
            let p = to_percent(d, &CAL);
            assert!(p <= last, "percent rose from {} to {} at {} cm", last, p, d);
            last = p;
            d += 0.5;
        }
    }

    #[test]
    fn degenerate_calibration_reports_empty() {
        let flat = TankCalibration {
            min_cm: 50.0,
            max_cm: 50.0,
        };
        assert_eq!(to_percent(10.0, &flat), 0);
    }
}
