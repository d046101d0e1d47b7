//! End-to-end integration tests: frames in, JSON out.
//!
//! Exercises the full path a real deployment uses — frame reassembly via
//! [`FrameRouter`], dispatch through [`AppService`], replies through a
//! transport mock that models which clients are currently connected.
//! Host-only concerns (real GPIO, the HTTP server) stay out; everything
//! behind the port traits runs for real.

use tanklevel::app::actuators::ActuatorTable;
use tanklevel::app::events::AppEvent;
use tanklevel::app::ports::{ClientId, ClientSink, EventSink, LevelSensorPort, MAX_CLIENTS};
use tanklevel::app::service::AppService;
use tanklevel::config::TankConfig;
use tanklevel::net::frame::{FrameInfo, FrameKind};
use tanklevel::net::router::FrameRouter;
use tanklevel::sensors::LevelSnapshot;

// ── Mock adapters ────────────────────────────────────────────

struct FixedSensors(LevelSnapshot);

impl LevelSensorPort for FixedSensors {
    fn read_levels(&mut self) -> LevelSnapshot {
        self.0
    }
}

/// Transport mock with per-client connection state: broadcast reaches
/// exactly the clients connected at the moment of the call.
#[derive(Default)]
struct FakeTransport {
    connected: [bool; MAX_CLIENTS],
    sent: Vec<(ClientId, String)>,
}

impl FakeTransport {
    fn connect(&mut self, client: ClientId) {
        self.connected[client as usize] = true;
    }

    fn disconnect(&mut self, client: ClientId) {
        self.connected[client as usize] = false;
    }

    fn received_by(&self, client: ClientId) -> Vec<&str> {
        self.sent
            .iter()
            .filter(|(c, _)| *c == client)
            .map(|(_, t)| t.as_str())
            .collect()
    }
}

impl ClientSink for FakeTransport {
    fn unicast(&mut self, client: ClientId, text: &str) {
        if self.connected[client as usize] {
            self.sent.push((client, text.to_string()));
        }
    }

    fn broadcast(&mut self, text: &str) {
        for client in 0..MAX_CLIENTS as ClientId {
            if self.connected[client as usize] {
                self.sent.push((client, text.to_string()));
            }
        }
    }
}

#[derive(Default)]
struct CapturedEvents(Vec<AppEvent>);

impl EventSink for CapturedEvents {
    fn emit(&mut self, event: &AppEvent) {
        self.0.push(*event);
    }
}

fn frame(kind: FrameKind, fin: bool) -> FrameInfo {
    FrameInfo { kind, fin }
}

// ── Broadcast membership ─────────────────────────────────────

#[test]
fn broadcast_reaches_exactly_the_connected_clients() {
    let mut app = AppService::new(TankConfig::default());
    let mut sensors = FixedSensors(LevelSnapshot {
        up_cm: Some(92.5), // halfway for the 20–165 cm calibration
        down_cm: Some(10.0),
    });
    let mut transport = FakeTransport::default();
    let mut events = CapturedEvents::default();

    transport.connect(0);
    transport.connect(2);

    app.run_sample_cycle(&mut sensors, &mut transport, &mut events);

    assert_eq!(transport.received_by(0), vec![r#"{"lvlUP":50,"lvlDOWN":100}"#]);
    assert_eq!(transport.received_by(2), vec![r#"{"lvlUP":50,"lvlDOWN":100}"#]);
    assert!(transport.received_by(1).is_empty());
    assert!(transport.received_by(3).is_empty());
}

#[test]
fn client_joining_between_cycles_sees_only_later_cycles() {
    let mut app = AppService::new(TankConfig::default());
    let mut sensors = FixedSensors(LevelSnapshot {
        up_cm: Some(20.0),
        down_cm: Some(165.0),
    });
    let mut transport = FakeTransport::default();
    let mut events = CapturedEvents::default();

    transport.connect(0);
    app.run_sample_cycle(&mut sensors, &mut transport, &mut events);

    transport.connect(1);
    app.run_sample_cycle(&mut sensors, &mut transport, &mut events);

    assert_eq!(transport.received_by(0).len(), 2);
    assert_eq!(transport.received_by(1).len(), 1);
}

#[test]
fn disconnected_client_is_dropped_from_broadcast() {
    let mut app = AppService::new(TankConfig::default());
    let mut sensors = FixedSensors(LevelSnapshot {
        up_cm: None,
        down_cm: None,
    });
    let mut transport = FakeTransport::default();
    let mut events = CapturedEvents::default();

    transport.connect(0);
    transport.connect(1);
    app.run_sample_cycle(&mut sensors, &mut transport, &mut events);

    transport.disconnect(1);
    app.run_sample_cycle(&mut sensors, &mut transport, &mut events);

    assert_eq!(transport.received_by(0).len(), 2);
    assert_eq!(transport.received_by(1).len(), 1);
    // Both sensors dark: the dashboard still gets a full status object.
    assert_eq!(transport.received_by(0)[1], r#"{"lvlUP":null,"lvlDOWN":null}"#);
}

// ── Frame reassembly through the router ──────────────────────

#[test]
fn fragmented_request_dispatches_like_a_single_frame() {
    let mut app = AppService::new(TankConfig::default());
    let mut actuators = ActuatorTable::new();
    let mut transport = FakeTransport::default();
    let mut events = CapturedEvents::default();
    let mut router = FrameRouter::new();

    transport.connect(0);
    transport.connect(1);

    // Client 0 sends the Set split across three frames.
    let parts: [&[u8]; 3] = [br#"{"command":"Se"#, br#"t","id":7,"st"#, br#"atus":true}"#];
    assert!(router.feed(0, frame(FrameKind::Text, false), parts[0]).is_none());
    assert!(router.feed(0, frame(FrameKind::Continuation, false), parts[1]).is_none());
    let fragmented = router
        .feed(0, frame(FrameKind::Continuation, true), parts[2])
        .expect("final fragment completes the message");

    // Client 1 sends the identical request in one frame.
    let single = router
        .feed(1, frame(FrameKind::Text, true), br#"{"command":"Set","id":7,"status":true}"#)
        .expect("unfragmented text completes immediately");

    assert_eq!(fragmented, single);

    app.handle_message(0, &fragmented, &mut actuators, &mut transport, &mut events);
    app.handle_message(1, &single, &mut actuators, &mut transport, &mut events);

    // Both dispatched identically, and a Get confirms the stored state.
    let get = router
        .feed(1, frame(FrameKind::Text, true), br#"{"command":"Get","id":7}"#)
        .unwrap();
    app.handle_message(1, &get, &mut actuators, &mut transport, &mut events);
    assert_eq!(transport.received_by(1), vec![r#"{"id":7,"status":true}"#]);
}

#[test]
fn interleaved_fragments_from_two_clients_do_not_mix() {
    let mut router = FrameRouter::new();

    router.feed(0, frame(FrameKind::Text, false), b"AAAA");
    router.feed(1, frame(FrameKind::Text, false), b"BBBB");
    let from_1 = router.feed(1, frame(FrameKind::Continuation, true), b"bbbb");
    let from_0 = router.feed(0, frame(FrameKind::Continuation, true), b"aaaa");

    assert_eq!(from_0.unwrap(), "AAAAaaaa");
    assert_eq!(from_1.unwrap(), "BBBBbbbb");
}

// ── Error handling at the edge ───────────────────────────────

#[test]
fn malformed_request_earns_error_reply_only_to_sender() {
    let mut app = AppService::new(TankConfig::default());
    let mut actuators = ActuatorTable::new();
    let mut transport = FakeTransport::default();
    let mut events = CapturedEvents::default();
    let mut router = FrameRouter::new();

    transport.connect(0);
    transport.connect(1);

    let garbage = router
        .feed(1, frame(FrameKind::Text, true), br#"{"command":"Explode"}"#)
        .unwrap();
    app.handle_message(1, &garbage, &mut actuators, &mut transport, &mut events);

    assert_eq!(transport.received_by(1), vec![r#"{"error":"malformed request"}"#]);
    assert!(transport.received_by(0).is_empty());
    assert!(actuators.is_empty());
    assert!(matches!(
        events.0.as_slice(),
        [AppEvent::RequestRejected { client: 1, .. }]
    ));
}

#[test]
fn binary_and_oversized_frames_never_reach_dispatch() {
    let mut router = FrameRouter::new();

    assert!(router.feed(0, frame(FrameKind::Binary, true), &[0u8; 64]).is_none());

    // Oversized fragmented message is discarded wholesale.
    let chunk = vec![b'x'; 1024];
    router.feed(0, frame(FrameKind::Text, false), &chunk);
    router.feed(0, frame(FrameKind::Continuation, false), &chunk);
    assert!(router.feed(0, frame(FrameKind::Continuation, true), &chunk).is_none());

    // The slot recovers for the next well-formed message.
    assert_eq!(
        router.feed(0, frame(FrameKind::Text, true), b"ok").unwrap(),
        "ok"
    );
}
