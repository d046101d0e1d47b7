//! Network layer: wire messages, WebSocket frame reassembly, and the
//! channels bridging the transport task to the main loop.
//!
//! | Module     | Purpose                                              |
//! |------------|------------------------------------------------------|
//! | `messages` | JSON wire shapes (`lvlUP`/`lvlDOWN` broadcast, replies) |
//! | `frame`    | Per-connection fragmented-message reassembly          |
//! | `router`   | Maps inbound frames to per-client assemblers          |
//! | `channels` | Static embassy-sync channels + outbound [`ClientSink`](crate::app::ports::ClientSink) |

pub mod channels;
pub mod frame;
pub mod messages;
pub mod router;
