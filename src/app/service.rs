//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the sampling/broadcast cycle and the request
//! dispatcher. All I/O flows through port traits injected at call
//! sites, making the entire service testable with mock adapters.
//!
//! ```text
//!  LevelSensorPort ──▶ ┌──────────────────────┐ ──▶ ClientSink
//!                      │      AppService       │ ──▶ EventSink
//!  ClientRequest ─────▶│  sample · dispatch    │
//!                      └──────────────────────┘
//!                              │ ▲
//!                              ▼ │
//!                      ActuatorStatePort
//! ```

use log::{info, warn};

use crate::config::TankConfig;
use crate::level;
use crate::net::messages::{ErrorResponse, GetResponse, TankStatus};
use crate::RequestError;

use super::commands::{parse_request, ClientRequest};
use super::events::AppEvent;
use super::ports::{ActuatorStatePort, ClientId, ClientSink, EventSink, LevelSensorPort};

/// The application service orchestrates all domain logic.
pub struct AppService {
    config: TankConfig,
    cycle_count: u64,
}

impl AppService {
    pub fn new(config: TankConfig) -> Self {
        Self {
            config,
            cycle_count: 0,
        }
    }

    // ── Sampling cycle ────────────────────────────────────────

    /// Run one full cycle: sample both tanks, convert to percentages,
    /// broadcast the result to every connected client.
    ///
    /// Invoked by the main loop whenever the sampling timer's pending
    /// flag is taken. Returns the status that was broadcast.
    pub fn run_sample_cycle(
        &mut self,
        sensors: &mut impl LevelSensorPort,
        clients: &mut impl ClientSink,
        sink: &mut impl EventSink,
    ) -> TankStatus {
        self.cycle_count += 1;

        let snapshot = sensors.read_levels();
        let status = TankStatus {
            lvl_up: snapshot.up_cm.map(|d| level::to_percent(d, &self.config.tank_up)),
            lvl_down: snapshot
                .down_cm
                .map(|d| level::to_percent(d, &self.config.tank_down)),
        };

        info!(
            "cycle {}: up {:?} cm -> {:?}%, down {:?} cm -> {:?}%",
            self.cycle_count, snapshot.up_cm, status.lvl_up, snapshot.down_cm, status.lvl_down
        );

        match serde_json::to_string(&status) {
            Ok(text) => clients.broadcast(&text),
            // Serialization of two Option<u8> fields cannot fail in
            // practice; degrade to a log line if it somehow does.
            Err(e) => warn!("broadcast serialize failed: {e}"),
        }

        sink.emit(&AppEvent::LevelsSampled(status));
        status
    }

    // ── Request dispatch ──────────────────────────────────────

    /// Handle one complete text message from `client`.
    ///
    /// Malformed input earns the sender an `{"error":...}` reply and is
    /// otherwise a no-op; nothing here is fatal, the next message simply
    /// starts fresh.
    pub fn handle_message(
        &mut self,
        client: ClientId,
        raw: &str,
        actuators: &mut impl ActuatorStatePort,
        clients: &mut impl ClientSink,
        sink: &mut impl EventSink,
    ) {
        match parse_request(raw) {
            Ok(ClientRequest::Set { id, status }) => match actuators.set(id, status) {
                Ok(()) => {
                    info!("client {client}: set actuator {id} = {status}");
                    sink.emit(&AppEvent::ActuatorSet { id, status });
                }
                Err(reason) => self.reject(client, reason, clients, sink),
            },
            Ok(ClientRequest::Get { id }) => {
                let response = GetResponse {
                    id,
                    status: actuators.get(id),
                };
                self.reply(client, &response, clients);
            }
            Err(reason) => self.reject(client, reason, clients, sink),
        }
    }

    /// Total sampling cycles executed since startup.
    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    // ── Internal ──────────────────────────────────────────────

    fn reply(&self, client: ClientId, response: &impl serde::Serialize, clients: &mut impl ClientSink) {
        match serde_json::to_string(response) {
            Ok(text) => clients.unicast(client, &text),
            Err(e) => warn!("response serialize failed: {e}"),
        }
    }

    fn reject(
        &self,
        client: ClientId,
        reason: RequestError,
        clients: &mut impl ClientSink,
        sink: &mut impl EventSink,
    ) {
        warn!("client {client}: request rejected ({reason})");
        self.reply(
            client,
            &ErrorResponse {
                error: reason.wire_reason(),
            },
            clients,
        );
        sink.emit(&AppEvent::RequestRejected { client, reason });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::actuators::ActuatorTable;
    use crate::sensors::LevelSnapshot;

    struct FixedSensors(LevelSnapshot);
    impl LevelSensorPort for FixedSensors {
        fn read_levels(&mut self) -> LevelSnapshot {
            self.0
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        unicasts: Vec<(ClientId, String)>,
        broadcasts: Vec<String>,
    }
    impl ClientSink for RecordingSink {
        fn unicast(&mut self, client: ClientId, text: &str) {
            self.unicasts.push((client, text.to_string()));
        }
        fn broadcast(&mut self, text: &str) {
            self.broadcasts.push(text.to_string());
        }
    }

    #[derive(Default)]
    struct NullEvents(Vec<AppEvent>);
    impl EventSink for NullEvents {
        fn emit(&mut self, event: &AppEvent) {
            self.0.push(*event);
        }
    }

    #[test]
    fn cycle_broadcasts_converted_levels() {
        let mut app = AppService::new(TankConfig::default());
        let mut sensors = FixedSensors(LevelSnapshot {
            up_cm: Some(20.0),  // full
            down_cm: Some(165.0), // empty
        });
        let mut clients = RecordingSink::default();
        let mut events = NullEvents::default();

        let status = app.run_sample_cycle(&mut sensors, &mut clients, &mut events);
        assert_eq!(status.lvl_up, Some(100));
        assert_eq!(status.lvl_down, Some(0));
        assert_eq!(clients.broadcasts, vec![r#"{"lvlUP":100,"lvlDOWN":0}"#]);
        assert_eq!(app.cycle_count(), 1);
    }

    #[test]
    fn unknown_reading_broadcasts_null() {
        let mut app = AppService::new(TankConfig::default());
        let mut sensors = FixedSensors(LevelSnapshot {
            up_cm: None,
            down_cm: Some(100.0),
        });
        let mut clients = RecordingSink::default();
        let mut events = NullEvents::default();

        let status = app.run_sample_cycle(&mut sensors, &mut clients, &mut events);
        assert_eq!(status.lvl_up, None);
        assert!(clients.broadcasts[0].starts_with(r#"{"lvlUP":null"#));
    }

    #[test]
    fn set_then_get_roundtrips() {
        let mut app = AppService::new(TankConfig::default());
        let mut actuators = ActuatorTable::new();
        let mut clients = RecordingSink::default();
        let mut events = NullEvents::default();

        app.handle_message(
            1,
            r#"{"command":"Set","id":5,"status":true}"#,
            &mut actuators,
            &mut clients,
            &mut events,
        );
        assert!(clients.unicasts.is_empty(), "Set is fire-and-forget");

        app.handle_message(
            2,
            r#"{"command":"Get","id":5}"#,
            &mut actuators,
            &mut clients,
            &mut events,
        );
        assert_eq!(clients.unicasts, vec![(2, r#"{"id":5,"status":true}"#.to_string())]);
    }

    #[test]
    fn get_of_unset_id_answers_null() {
        let mut app = AppService::new(TankConfig::default());
        let mut actuators = ActuatorTable::new();
        let mut clients = RecordingSink::default();
        let mut events = NullEvents::default();

        app.handle_message(
            0,
            r#"{"command":"Get","id":9}"#,
            &mut actuators,
            &mut clients,
            &mut events,
        );
        assert_eq!(clients.unicasts, vec![(0, r#"{"id":9,"status":null}"#.to_string())]);
    }

    #[test]
    fn malformed_input_earns_error_reply_and_nothing_else() {
        let mut app = AppService::new(TankConfig::default());
        let mut actuators = ActuatorTable::new();
        let mut clients = RecordingSink::default();
        let mut events = NullEvents::default();

        app.handle_message(3, "{{nope", &mut actuators, &mut clients, &mut events);

        assert_eq!(
            clients.unicasts,
            vec![(3, r#"{"error":"malformed request"}"#.to_string())]
        );
        assert!(clients.broadcasts.is_empty());
        assert!(actuators.is_empty());
        assert!(matches!(
            events.0.as_slice(),
            [AppEvent::RequestRejected { client: 3, .. }]
        ));
    }
}
