//! Inter-task communication channels.
//!
//! Uses `embassy-sync` bounded MPMC channels to bridge the WebSocket
//! handler (runs on the HTTP server's threads) with the synchronous
//! main loop. Both sides share these static channels without heap
//! allocation at the boundary.
//!
//! ```text
//! ┌──────────────┐  InboundMsg   ┌──────────────┐
//! │  WS handler  │─────────────▶│   Main loop   │
//! │  (httpd)     │◀─────────────│   (sync)      │
//! └──────────────┘  OutboundMsg  └──────────────┘
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use heapless::Vec;
use log::warn;

use crate::app::ports::{ClientId, ClientSink};

use super::frame::FrameInfo;

/// Largest single frame the handler will forward. Larger messages must
/// arrive fragmented and are bounded again by the assembler.
pub const MAX_FRAME_PAYLOAD: usize = 512;

/// Largest outbound wire message. Status broadcasts and command replies
/// are all well under this.
pub const MAX_OUTBOUND_TEXT: usize = 256;

/// One inbound frame from a client, delivered to the main loop.
pub struct InboundMsg {
    pub client: ClientId,
    pub info: FrameInfo,
    pub payload: Vec<u8, MAX_FRAME_PAYLOAD>,
}

/// Delivery target for an outbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendTarget {
    One(ClientId),
    All,
}

/// Outbound wire text from the main loop, delivered to the sender task.
pub struct OutboundMsg {
    pub target: SendTarget,
    pub text: heapless::String<MAX_OUTBOUND_TEXT>,
}

/// Notification of a closed connection.
pub struct DisconnectMsg {
    pub client: ClientId,
}

const INBOUND_DEPTH: usize = 8;
const OUTBOUND_DEPTH: usize = 16;

/// Inbound frame channel: WS handler → main loop.
pub static INBOUND_CHANNEL: Channel<CriticalSectionRawMutex, InboundMsg, INBOUND_DEPTH> =
    Channel::new();

/// Outbound message channel: main loop → sender task.
pub static OUTBOUND_CHANNEL: Channel<CriticalSectionRawMutex, OutboundMsg, OUTBOUND_DEPTH> =
    Channel::new();

/// Disconnect notifications: WS handler → main loop.
pub static DISCONNECT_CHANNEL: Channel<CriticalSectionRawMutex, DisconnectMsg, 4> = Channel::new();

/// [`ClientSink`] implementation that enqueues onto [`OUTBOUND_CHANNEL`].
///
/// Non-blocking: if the outbound channel is full (sender task stalled),
/// the message is dropped with a warning rather than wedging the main
/// loop. The next sampling cycle replaces a dropped broadcast anyway.
pub struct ChannelClientSink;

impl ChannelClientSink {
    fn enqueue(&self, target: SendTarget, text: &str) {
        let Ok(text) = heapless::String::try_from(text) else {
            warn!("outbound message over {MAX_OUTBOUND_TEXT} bytes, dropping");
            return;
        };
        if OUTBOUND_CHANNEL.try_send(OutboundMsg { target, text }).is_err() {
            warn!("outbound channel full, dropping message for {target:?}");
        }
    }
}

impl ClientSink for ChannelClientSink {
    fn unicast(&mut self, client: ClientId, text: &str) {
        self.enqueue(SendTarget::One(client), text);
    }

    fn broadcast(&mut self, text: &str) {
        self.enqueue(SendTarget::All, text);
    }
}
