//! Unified error types for the tanklevel firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping
//! the top-level loop's error handling uniform. All variants are `Copy`
//! so they pass through the sampling and dispatch paths without
//! allocation.

use core::fmt;

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A sensor could not produce a usable reading.
    Sensor(SensorError),
    /// An inbound client request was rejected.
    Request(RequestError),
    /// A communication subsystem failed.
    Comms(CommsError),
    /// Peripheral or service initialisation failed.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Request(e) => write!(f, "request: {e}"),
            Self::Comms(e) => write!(f, "comms: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// No echo returned within the configured maximum range.
    NoEcho,
    /// The echo timing was outside the physically plausible window.
    OutOfRange,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoEcho => write!(f, "no echo within range"),
            Self::OutOfRange => write!(f, "echo out of range"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

/// Rejection reasons for inbound client requests. Each maps onto an
/// error response sent back to the offending client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestError {
    /// Payload was not valid JSON, or lacked the required typed fields.
    Malformed,
    /// The actuator registry has no room for another id.
    RegistryFull,
}

impl RequestError {
    /// Stable wire string placed in the `error` field of the response.
    pub const fn wire_reason(self) -> &'static str {
        match self {
            Self::Malformed => "malformed request",
            Self::RegistryFull => "actuator registry full",
        }
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_reason())
    }
}

impl From<RequestError> for Error {
    fn from(e: RequestError) -> Self {
        Self::Request(e)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommsError {
    /// A bounded inter-task channel was full; the message was dropped.
    ChannelFull,
    /// The destination client disconnected before the send.
    ClientGone,
    WifiConnectFailed,
}

impl fmt::Display for CommsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ChannelFull => write!(f, "channel full"),
            Self::ClientGone => write!(f, "client disconnected"),
            Self::WifiConnectFailed => write!(f, "WiFi connect failed"),
        }
    }
}

impl From<CommsError> for Error {
    fn from(e: CommsError) -> Self {
        Self::Comms(e)
    }
}

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
