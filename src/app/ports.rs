//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (the sensor hub, the WebSocket transport, log sinks)
//! implement these traits. The [`AppService`](super::service::AppService)
//! consumes them via generics, so the domain core never touches hardware
//! or sockets directly.

use crate::sensors::LevelSnapshot;

/// Opaque connection identity assigned by the transport. The core only
/// uses it to address unicast responses; lifecycle is the transport's.
pub type ClientId = u8;

/// Connection slots the transport may hand out.
pub const MAX_CLIENTS: usize = 4;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this once per sampling cycle.
pub trait LevelSensorPort {
    /// Sample both tanks. `None` entries are unknown readings (no echo),
    /// never zero.
    fn read_levels(&mut self) -> LevelSnapshot;
}

// ───────────────────────────────────────────────────────────────
// Client sink port (domain → connected WebSocket clients)
// ───────────────────────────────────────────────────────────────

/// Write-side port for outbound wire messages.
///
/// Delivery is best-effort and fire-and-forget: implementations swallow
/// transport failures and must never block the caller on a slow client.
pub trait ClientSink {
    /// Send to one client. A stale `client` is silently ignored.
    fn unicast(&mut self, client: ClientId, text: &str);

    /// Send to every currently connected client.
    fn broadcast(&mut self, text: &str);
}

// ───────────────────────────────────────────────────────────────
// Actuator state port (domain ↔ process-wide status registry)
// ───────────────────────────────────────────────────────────────

/// Accessor interface over the actuator status registry, so the
/// in-memory table can later be swapped for persistent storage without
/// touching the dispatcher.
pub trait ActuatorStatePort {
    /// Last-set status for `id`; `None` if never set.
    fn get(&self, id: u16) -> Option<bool>;

    /// Record `status` for `id`.
    fn set(&mut self, id: u16, status: bool) -> Result<(), crate::RequestError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go (serial log today;
/// anything else later).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
