//! Per-client frame routing.
//!
//! Each connection slot owns its own [`MessageAssembler`] so one client's
//! half-finished fragmented message can never bleed into another's.

use log::warn;

use crate::app::ports::{ClientId, MAX_CLIENTS};

use super::frame::{FrameInfo, MessageAssembler};

/// Routes inbound frames to the right per-client assembler.
pub struct FrameRouter {
    assemblers: [MessageAssembler; MAX_CLIENTS],
}

impl FrameRouter {
    pub fn new() -> Self {
        Self {
            assemblers: core::array::from_fn(|_| MessageAssembler::new()),
        }
    }

    /// Feed one frame from `client`. Returns a complete text message
    /// when the client's final fragment lands.
    pub fn feed(&mut self, client: ClientId, info: FrameInfo, payload: &[u8]) -> Option<String> {
        let Some(assembler) = self.assemblers.get_mut(client as usize) else {
            warn!("router: frame from out-of-range client {client}");
            return None;
        };
        assembler.feed(info, payload)
    }

    /// Discard any partial message for a disconnected client so the slot
    /// is clean when a new connection reuses it.
    pub fn reset_client(&mut self, client: ClientId) {
        if let Some(assembler) = self.assemblers.get_mut(client as usize) {
            assembler.reset();
        }
    }
}

impl Default for FrameRouter {
    fn default() -> Self {
        Self::new()
    }
}
