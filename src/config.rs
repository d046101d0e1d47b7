//! System configuration parameters.
//!
//! All tunable parameters for the tank monitor. Calibration values and
//! network addressing are compile-time configuration: the defaults below
//! are the installed values for the two physical tanks.

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

use crate::level::TankCalibration;

/// Core system configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TankConfig {
    // --- Sampling ---
    /// Maximum sensor range (cm); echoes beyond this count as "no reading".
    pub max_range_cm: f32,
    /// Number of pings taken per sample; the median is kept.
    pub median_window: u8,
    /// Seconds between sampling cycles.
    pub sample_interval_secs: u32,

    // --- Calibration ---
    /// Upper tank: distance from sensor to water at full / empty.
    pub tank_up: TankCalibration,
    /// Lower tank calibration.
    pub tank_down: TankCalibration,
}

impl Default for TankConfig {
    fn default() -> Self {
        Self {
            max_range_cm: 400.0,
            median_window: 5,
            sample_interval_secs: 3,

            // Installed geometry: water surface sits 20 cm below the
            // sensor when the upper tank is full, 165 cm when empty.
            tank_up: TankCalibration {
                min_cm: 20.0,
                max_cm: 165.0,
            },
            tank_down: TankCalibration {
                min_cm: 10.0,
                max_cm: 165.0,
            },
        }
    }
}

/// Station-mode network addressing. The device uses a fixed address so the
/// dashboard is reachable at a known URL without DHCP reservations.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    pub ssid: &'static str,
    pub password: &'static str,
    pub ip: Ipv4Addr,
    pub gateway: Ipv4Addr,
    /// Subnet prefix length (24 = 255.255.255.0).
    pub prefix_len: u8,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            ssid: "tanknet",
            password: "change-me-please",
            ip: Ipv4Addr::new(192, 168, 1, 100),
            gateway: Ipv4Addr::new(192, 168, 1, 1),
            prefix_len: 24,
        }
    }
}
