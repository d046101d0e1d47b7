//! Low-level drivers beneath the adapter layer.

pub mod hw_timer;
