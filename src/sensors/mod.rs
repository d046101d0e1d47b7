//! Sensor subsystem — the ultrasonic driver and the aggregating [`SensorHub`].
//!
//! The hub owns one ranging sensor per tank and produces a
//! [`LevelSnapshot`] each sampling cycle.

pub mod ultrasonic;

use ultrasonic::UltrasonicSensor;

use crate::app::ports::LevelSensorPort;

/// Which physical tank a reading belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tank {
    /// Upper tank (roof reservoir).
    Up,
    /// Lower tank (ground cistern).
    Down,
}

/// One cycle's worth of raw distances. `None` = the sensor saw no echo.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelSnapshot {
    pub up_cm: Option<f32>,
    pub down_cm: Option<f32>,
}

/// Owns both sensors; the only place the blocking echo wait happens.
pub struct SensorHub {
    up: UltrasonicSensor,
    down: UltrasonicSensor,
}

impl SensorHub {
    pub fn new(up: UltrasonicSensor, down: UltrasonicSensor) -> Self {
        debug_assert_eq!(up.tank(), Tank::Up);
        debug_assert_eq!(down.tank(), Tank::Down);
        Self { up, down }
    }

    /// Build the hub from configuration and the board pinout.
    pub fn from_config(config: &crate::config::TankConfig) -> Self {
        Self::new(
            UltrasonicSensor::new(
                Tank::Up,
                crate::pins::LEVEL_UP_GPIO,
                config.max_range_cm,
                config.median_window,
            ),
            UltrasonicSensor::new(
                Tank::Down,
                crate::pins::LEVEL_DOWN_GPIO,
                config.max_range_cm,
                config.median_window,
            ),
        )
    }
}

impl LevelSensorPort for SensorHub {
    fn read_levels(&mut self) -> LevelSnapshot {
        LevelSnapshot {
            up_cm: self.up.read(),
            down_cm: self.down.read(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TankConfig;

    #[test]
    fn hub_reads_both_tanks() {
        let _sim = ultrasonic::SIM_LOCK.lock().unwrap();
        let mut hub = SensorHub::from_config(&TankConfig::default());
        ultrasonic::sim_set_distance_cm(Tank::Up, 50.0);
        ultrasonic::sim_set_echo_us(Tank::Down, 0);

        let snap = hub.read_levels();
        assert!((snap.up_cm.unwrap() - 50.0).abs() < 1.0);
        assert!(snap.down_cm.is_none());
    }
}
