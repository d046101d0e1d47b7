//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the business rules for the tank monitor:
//! sampling orchestration, unit conversion, request dispatch, and the
//! actuator status registry. All interaction with hardware and the
//! network happens through **port traits** defined in [`ports`], keeping
//! this layer fully testable without real peripherals or sockets.

pub mod actuators;
pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
