//! Tanklevel firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod events;
pub mod level;
pub mod net;

mod error;
mod pins;

pub use error::{CommsError, Error, RequestError, Result, SensorError};

// Re-export the ESP-IDF-only modules so the crate compiles everywhere;
// the hardware halves are guarded by cfg attributes inside.
pub mod adapters;
pub mod drivers;
pub mod sensors;
