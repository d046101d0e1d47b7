//! Timer-to-main-loop signaling.
//!
//! The sampling timer fires in the esp_timer task context and marks a
//! pending-sample flag; the main loop reads-and-clears it. A single
//! `AtomicBool` is the only shared mutable state crossing that boundary:
//!
//! ```text
//! ┌────────────┐  mark_sample_due()  ┌──────────────┐
//! │ Timer task │────────────────────▶│  AtomicBool  │
//! └────────────┘                     └──────┬───────┘
//!                                           │ take_sample_due()
//!                                           ▼
//!                                    ┌──────────────┐
//!                                    │  Main loop   │
//!                                    └──────────────┘
//! ```
//!
//! The flag is deliberately a boolean, not a counter: if the main loop is
//! slow, ticks arriving while the flag is already set are dropped. At most
//! one sampling cycle is ever pending.

use core::sync::atomic::{AtomicBool, Ordering};

static SAMPLE_DUE: AtomicBool = AtomicBool::new(false);

/// Mark a sampling cycle as due. Safe to call from timer/ISR context.
pub fn mark_sample_due() {
    SAMPLE_DUE.store(true, Ordering::Release);
}

/// Atomically read and clear the pending flag. Called from the main loop
/// (single consumer); returns `true` at most once per `mark_sample_due`.
pub fn take_sample_due() -> bool {
    SAMPLE_DUE.swap(false, Ordering::AcqRel)
}

/// Peek without clearing (diagnostics only).
pub fn sample_pending() -> bool {
    SAMPLE_DUE.load(Ordering::Acquire)
}

#[cfg(test)]
mod tests {
    use super::*;

    // One test, because the flag is a process-wide static: splitting
    // the assertions across tests would race under the parallel runner.
    #[test]
    fn flag_is_take_once_and_coalescing() {
        while take_sample_due() {}

        mark_sample_due();
        assert!(sample_pending());
        assert!(take_sample_due());
        assert!(!take_sample_due());

        // Ticks arriving while already pending coalesce into one cycle.
        mark_sample_due();
        mark_sample_due();
        assert!(take_sample_due());
        assert!(!take_sample_due(), "coalesced ticks must not double-fire");
    }
}
