//! Inbound client requests.
//!
//! Wire messages are loosely-typed JSON keyed on a `command` field; we
//! parse them into a tagged variant so every handler downstream works
//! with validated, correctly-typed data. Anything that does not fit —
//! bad JSON, a missing field, a wrong type, an unknown command — is
//! rejected with an explicit [`RequestError`] rather than silently
//! ignored.

use serde::Deserialize;

use crate::RequestError;

/// A validated client request.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "command")]
pub enum ClientRequest {
    /// `{"command":"Set","id":N,"status":B}` — record an actuator status.
    Set { id: u16, status: bool },
    /// `{"command":"Get","id":N}` — read back the last-set status.
    Get { id: u16 },
}

/// Parse a raw text message into a [`ClientRequest`].
pub fn parse_request(raw: &str) -> Result<ClientRequest, RequestError> {
    serde_json::from_str(raw).map_err(|e| {
        log::debug!("request parse failed: {e}");
        RequestError::Malformed
    })
}
