//! WebSocket message reassembly.
//!
//! The transport delivers individual frames; a logical message may span
//! several of them:
//!
//! ```text
//! Frame 1: [Text,         fin=false]  payload part 1
//! Frame 2: [Continuation, fin=false]  payload part 2
//! Frame N: [Continuation, fin=true ]  payload part N (final)
//! ```
//!
//! One [`MessageAssembler`] per connection accumulates fragments and
//! yields the complete message when the final frame lands. Only text
//! messages are dispatched; binary ones are logged and dropped, matching
//! the dashboard protocol which is JSON-only.

use log::{debug, warn};

/// Upper bound on a reassembled message (protects against memory
/// exhaustion from a misbehaving client).
pub const MAX_MESSAGE_SIZE: usize = 2048;

/// Frame opcode, as reported by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Text,
    Binary,
    /// Follow-up fragment of a message started by Text/Binary.
    Continuation,
}

/// Per-frame metadata the assembler needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameInfo {
    pub kind: FrameKind,
    /// Final frame of the message.
    pub fin: bool,
}

impl FrameInfo {
    pub const fn text(fin: bool) -> Self {
        Self {
            kind: FrameKind::Text,
            fin,
        }
    }
}

/// Reassembly buffer for one connection's inbound fragments.
pub struct MessageAssembler {
    buffer: Vec<u8>,
    /// Opcode of the message in progress; `None` = idle.
    in_progress: Option<FrameKind>,
}

impl MessageAssembler {
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            in_progress: None,
        }
    }

    /// Feed one frame.
    ///
    /// Returns `Some(message)` when a complete *text* message is ready.
    /// Complete binary messages and stray continuations return `None`.
    pub fn feed(&mut self, info: FrameInfo, payload: &[u8]) -> Option<String> {
        match info.kind {
            FrameKind::Text | FrameKind::Binary => {
                if self.in_progress.is_some() {
                    // New message started mid-reassembly; the old one can
                    // never complete now.
                    warn!("assembler: discarding {} buffered bytes", self.buffer.len());
                }
                self.buffer.clear();
                self.in_progress = Some(info.kind);
                self.append(payload)?;
            }
            FrameKind::Continuation => {
                if self.in_progress.is_none() {
                    debug!("assembler: continuation with no message in progress");
                    return None;
                }
                self.append(payload)?;
            }
        }

        if !info.fin {
            return None;
        }

        let kind = self.in_progress.take();
        let complete = core::mem::take(&mut self.buffer);

        match kind {
            Some(FrameKind::Text) => match String::from_utf8(complete) {
                Ok(text) => Some(text),
                Err(_) => {
                    warn!("assembler: text message was not valid UTF-8");
                    None
                }
            },
            _ => {
                debug!("assembler: dropping {}-byte binary message", complete.len());
                None
            }
        }
    }

    /// Drop any partial message (connection closed or errored).
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.in_progress = None;
    }

    /// Whether a multi-frame message is mid-reassembly.
    pub fn is_active(&self) -> bool {
        self.in_progress.is_some()
    }

    fn append(&mut self, payload: &[u8]) -> Option<()> {
        if self.buffer.len() + payload.len() > MAX_MESSAGE_SIZE {
            warn!("assembler: message exceeds {} bytes, dropping", MAX_MESSAGE_SIZE);
            self.reset();
            return None;
        }
        self.buffer.extend_from_slice(payload);
        Some(())
    }
}

impl Default for MessageAssembler {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ────────────────────────────────────────────────────
