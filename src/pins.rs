//! GPIO pin assignments for the tank monitor board.
//!
//! Single source of truth — every driver references this module rather
//! than hard-coding pin numbers.
//!
//! Both HC-SR04-style sensors are wired in single-wire mode: trigger and
//! echo share one GPIO, and the driver switches the pin direction around
//! the pulse.

/// Upper tank ultrasonic sensor (trigger + echo, single wire).
pub const LEVEL_UP_GPIO: i32 = 19;

/// Lower tank ultrasonic sensor (trigger + echo, single wire).
pub const LEVEL_DOWN_GPIO: i32 = 32;
