//! HC-SR04-compatible ultrasonic ranging driver.
//!
//! Each sample takes a fixed number of pings, drops the ones that never
//! echoed, and keeps the median of the rest — a cheap filter against the
//! single wild reflections these sensors are prone to.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the shared trigger/echo GPIO and times the echo
//! pulse with `esp_timer_get_time`.
//! On host/test: echo round-trip times are injected through per-tank
//! atomics (`0` = no echo).

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU32, Ordering};

use super::Tank;

/// Echo round-trip microseconds per centimeter of distance
/// (2 / speed-of-sound in cm/µs).
pub const US_ROUND_TRIP_PER_CM: f32 = 58.3;

/// Largest ping burst a sample may request.
pub const MAX_MEDIAN_WINDOW: usize = 15;

#[cfg(not(target_os = "espidf"))]
static SIM_ECHO_UP_US: AtomicU32 = AtomicU32::new(0);
#[cfg(not(target_os = "espidf"))]
static SIM_ECHO_DOWN_US: AtomicU32 = AtomicU32::new(0);

/// Tests that inject sim echoes hold this to keep the shared atomics
/// from racing under the parallel test runner.
#[cfg(test)]
pub(crate) static SIM_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Inject a simulated echo time for host tests. `0` means no echo.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_echo_us(tank: Tank, micros: u32) {
    match tank {
        Tank::Up => SIM_ECHO_UP_US.store(micros, Ordering::Relaxed),
        Tank::Down => SIM_ECHO_DOWN_US.store(micros, Ordering::Relaxed),
    }
}

/// Convenience for tests: inject a distance instead of raw timing.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_distance_cm(tank: Tank, cm: f32) {
    sim_set_echo_us(tank, (cm * US_ROUND_TRIP_PER_CM) as u32);
}

pub struct UltrasonicSensor {
    tank: Tank,
    /// Shared trigger/echo pin (single-wire wiring).
    _gpio: i32,
    max_range_cm: f32,
    median_window: usize,
}

impl UltrasonicSensor {
    pub fn new(tank: Tank, gpio: i32, max_range_cm: f32, median_window: u8) -> Self {
        Self {
            tank,
            _gpio: gpio,
            max_range_cm,
            median_window: (median_window as usize).clamp(1, MAX_MEDIAN_WINDOW),
        }
    }

    pub fn tank(&self) -> Tank {
        self.tank
    }

    /// Take one sample: `median_window` pings, median of the echoes that
    /// returned, converted to centimeters.
    ///
    /// Returns `None` when every ping timed out — an "unknown reading",
    /// which callers must not conflate with zero distance.
    ///
    /// Blocks for the echo wait (bounded by `max_range_cm`); must only be
    /// called from the main scheduling context, one instance per sensor.
    pub fn read(&mut self) -> Option<f32> {
        let mut echoes = [0u32; MAX_MEDIAN_WINDOW];
        let mut count = 0;

        for _ in 0..self.median_window {
            if let Some(us) = self.ping_once() {
                echoes[count] = us;
                count += 1;
            }
        }

        if count == 0 {
            log::debug!("ultrasonic[{:?}]: no echo in {} pings", self.tank, self.median_window);
            return None;
        }

        echoes[..count].sort_unstable();
        let median_us = echoes[count / 2];
        Some(median_us as f32 / US_ROUND_TRIP_PER_CM)
    }

    /// Echo timeout in microseconds for the configured maximum range.
    fn timeout_us(&self) -> u32 {
        (self.max_range_cm * US_ROUND_TRIP_PER_CM) as u32
    }

    // ── Platform-specific ping ────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn ping_once(&mut self) -> Option<u32> {
        use esp_idf_svc::sys::{
            esp_rom_delay_us, esp_timer_get_time, gpio_get_level, gpio_mode_t_GPIO_MODE_INPUT,
            gpio_mode_t_GPIO_MODE_OUTPUT, gpio_set_direction, gpio_set_level,
        };

        let pin = self._gpio;
        let timeout = self.timeout_us() as i64;

        // SAFETY: raw IDF GPIO calls on a pin this driver exclusively owns.
        unsafe {
            // Trigger: 10µs high pulse, then release the wire for the echo.
            gpio_set_direction(pin, gpio_mode_t_GPIO_MODE_OUTPUT);
            gpio_set_level(pin, 0);
            esp_rom_delay_us(4);
            gpio_set_level(pin, 1);
            esp_rom_delay_us(10);
            gpio_set_level(pin, 0);
            gpio_set_direction(pin, gpio_mode_t_GPIO_MODE_INPUT);

            // Wait for the echo line to rise.
            let start = esp_timer_get_time();
            while gpio_get_level(pin) == 0 {
                if esp_timer_get_time() - start > timeout {
                    return None;
                }
            }

            // Time the high pulse.
            let rise = esp_timer_get_time();
            while gpio_get_level(pin) == 1 {
                if esp_timer_get_time() - rise > timeout {
                    return None;
                }
            }
            Some((esp_timer_get_time() - rise) as u32)
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn ping_once(&mut self) -> Option<u32> {
        let us = match self.tank {
            Tank::Up => SIM_ECHO_UP_US.load(Ordering::Relaxed),
            Tank::Down => SIM_ECHO_DOWN_US.load(Ordering::Relaxed),
        };
        if us == 0 || us > self.timeout_us() {
            None
        } else {
            Some(us)
        }
    }
}
