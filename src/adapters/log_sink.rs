//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (UART / USB-CDC in production). A future MQTT or
//! NVS-journal adapter would implement the same trait.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::LevelsSampled(status) => {
                info!(
                    "LEVELS | up={} | down={}",
                    fmt_pct(status.lvl_up),
                    fmt_pct(status.lvl_down),
                );
            }
            AppEvent::ActuatorSet { id, status } => {
                info!("ACTUATOR | id={id} -> {status}");
            }
            AppEvent::RequestRejected { client, reason } => {
                warn!("REJECT | client={client} | {reason}");
            }
        }
    }
}

fn fmt_pct(v: Option<u8>) -> heapless::String<8> {
    let mut s = heapless::String::new();
    match v {
        // 8 bytes always fits "100%" and "??".
        Some(p) => {
            let _ = core::fmt::write(&mut s, format_args!("{p}%"));
        }
        None => {
            let _ = s.push_str("??");
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::messages::TankStatus;

    #[test]
    fn emit_accepts_every_event_shape() {
        let mut sink = LogEventSink::new();
        sink.emit(&AppEvent::LevelsSampled(TankStatus {
            lvl_up: Some(42),
            lvl_down: None,
        }));
        sink.emit(&AppEvent::ActuatorSet { id: 3, status: true });
        sink.emit(&AppEvent::RequestRejected {
            client: 1,
            reason: crate::RequestError::Malformed,
        });
    }

    #[test]
    fn percent_formatting() {
        assert_eq!(fmt_pct(Some(100)).as_str(), "100%");
        assert_eq!(fmt_pct(None).as_str(), "??");
    }
}
