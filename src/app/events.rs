//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port. Adapters on the other
//! side decide what to do with them — today that is the serial log.

use crate::net::messages::TankStatus;

use super::ports::ClientId;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppEvent {
    /// A sampling cycle completed and its result was broadcast.
    LevelsSampled(TankStatus),

    /// A client stored an actuator status.
    ActuatorSet { id: u16, status: bool },

    /// A client request was rejected.
    RequestRejected {
        client: ClientId,
        reason: crate::RequestError,
    },
}
