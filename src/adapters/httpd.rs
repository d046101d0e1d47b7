//! HTTP + WebSocket transport (ESP-IDF only).
//!
//! One `EspHttpServer` serves both concerns:
//!
//! - **Static dashboard**: GET requests map onto files under `/spiffs`
//!   (`/` → `index.html`); unknown paths answer `400 Not found`.
//! - **`/ws` endpoint**: each connection gets a slot, a greeting, and a
//!   detached sender kept in a shared table so the main loop can push
//!   broadcasts without holding the request thread.
//!
//! Inbound frames cross [`INBOUND_CHANNEL`] to the main loop; outbound
//! text crosses back over [`OUTBOUND_CHANNEL`] and is drained here by a
//! dedicated sender thread.
//!
//! ```text
//!  browser ──GET /──▶ spiffs files
//!  browser ──WS  ──▶ ws handler ──INBOUND──▶ main loop
//!                     sender thread ◀─OUTBOUND── main loop
//! ```

use std::sync::{Arc, Mutex};

use esp_idf_svc::http::server::ws::EspHttpWsDetachedSender;
use esp_idf_svc::http::server::{Configuration, EspHttpServer};
use esp_idf_svc::http::Method;
use esp_idf_svc::io::Write as _;
use esp_idf_svc::sys::EspError;
use esp_idf_svc::ws::FrameType;
use log::{info, warn};

use crate::app::ports::{ClientId, MAX_CLIENTS};
use crate::net::channels::{
    DisconnectMsg, InboundMsg, SendTarget, DISCONNECT_CHANNEL, INBOUND_CHANNEL, MAX_FRAME_PAYLOAD,
    OUTBOUND_CHANNEL,
};
use crate::net::frame::{FrameInfo, FrameKind};

const SENDER_TASK_STACK: usize = 8 * 1024;

// ── Client slot table ────────────────────────────────────────

struct ClientSlot {
    session: i32,
    sender: EspHttpWsDetachedSender,
}

type SlotTable = Arc<Mutex<[Option<ClientSlot>; MAX_CLIENTS]>>;

fn find_slot(slots: &[Option<ClientSlot>; MAX_CLIENTS], session: i32) -> Option<usize> {
    slots
        .iter()
        .position(|s| s.as_ref().is_some_and(|c| c.session == session))
}

// ── Server ───────────────────────────────────────────────────

/// Owns the HTTP server; dropping it tears the transport down.
pub struct HttpTransport {
    _server: EspHttpServer<'static>,
}

impl HttpTransport {
    /// Start the server, register the dashboard and `/ws` handlers, and
    /// spawn the outbound sender thread.
    pub fn start() -> anyhow::Result<Self> {
        let mut server = EspHttpServer::new(&Configuration {
            uri_match_wildcard: true,
            ..Default::default()
        })?;

        let slots: SlotTable = Arc::new(Mutex::new([const { None }; MAX_CLIENTS]));

        register_ws(&mut server, Arc::clone(&slots))?;
        register_static_files(&mut server)?;
        spawn_sender(slots)?;

        info!("http: server up, dashboard at / and websocket at /ws");
        Ok(Self { _server: server })
    }
}

// ── WebSocket handler ────────────────────────────────────────

fn register_ws(server: &mut EspHttpServer<'static>, slots: SlotTable) -> anyhow::Result<()> {
    server.ws_handler("/ws", move |ws| -> Result<(), EspError> {
        let session = ws.session();

        if ws.is_new() {
            let Ok(mut table) = slots.lock() else {
                return Ok(());
            };
            let Some(free) = table.iter().position(Option::is_none) else {
                warn!("ws: all {MAX_CLIENTS} slots taken, refusing session {session}");
                ws.send(FrameType::Close, &[])?;
                return Ok(());
            };

            let sender = ws.create_detached_sender()?;
            table[free] = Some(ClientSlot { session, sender });
            drop(table);

            info!("ws: client {free} connected (session {session})");
            let mut greeting = heapless::String::<32>::new();
            let _ = core::fmt::write(&mut greeting, format_args!("Hello Client {free} :)"));
            ws.send(FrameType::Text(false), greeting.as_bytes())?;
            ws.send(FrameType::Ping, &[])?;
            return Ok(());
        }

        if ws.is_closed() {
            let Ok(mut table) = slots.lock() else {
                return Ok(());
            };
            if let Some(idx) = find_slot(&table, session) {
                table[idx] = None;
                info!("ws: client {idx} disconnected");
                let client = idx as ClientId;
                if DISCONNECT_CHANNEL.try_send(DisconnectMsg { client }).is_err() {
                    warn!("ws: disconnect channel full");
                }
            }
            return Ok(());
        }

        // Data frame: probe type and length first, then read the payload.
        let (frame_type, len) = ws.recv(&mut [])?;
        if len > MAX_FRAME_PAYLOAD {
            warn!("ws: {len}-byte frame exceeds {MAX_FRAME_PAYLOAD}, dropping");
            return Ok(());
        }
        let mut buf = [0u8; MAX_FRAME_PAYLOAD];
        ws.recv(&mut buf)?;

        let info = match frame_type {
            FrameType::Text(fragmented) => FrameInfo {
                kind: FrameKind::Text,
                fin: !fragmented,
            },
            FrameType::Binary(fragmented) => FrameInfo {
                kind: FrameKind::Binary,
                fin: !fragmented,
            },
            FrameType::Continue(last) => FrameInfo {
                kind: FrameKind::Continuation,
                fin: last,
            },
            // Control frames are handled by the server.
            _ => return Ok(()),
        };

        let client = {
            let Ok(table) = slots.lock() else {
                return Ok(());
            };
            match find_slot(&table, session) {
                Some(idx) => idx as ClientId,
                None => {
                    warn!("ws: frame from unknown session {session}");
                    return Ok(());
                }
            }
        };

        let Ok(payload) = heapless::Vec::from_slice(&buf[..len]) else {
            return Ok(());
        };
        if INBOUND_CHANNEL.try_send(InboundMsg { client, info, payload }).is_err() {
            warn!("ws: inbound channel full, dropping frame from client {client}");
        }
        Ok(())
    })?;
    Ok(())
}

// ── Outbound sender thread ───────────────────────────────────

fn spawn_sender(slots: SlotTable) -> anyhow::Result<()> {
    std::thread::Builder::new()
        .name("ws_tx".into())
        .stack_size(SENDER_TASK_STACK)
        .spawn(move || sender_loop(slots))?;
    Ok(())
}

/// Blocks on [`OUTBOUND_CHANNEL`]; wakes only when the main loop pushes
/// a message, so the thread idles between sampling cycles.
fn sender_loop(slots: SlotTable) -> ! {
    loop {
        let msg = futures_lite::future::block_on(OUTBOUND_CHANNEL.receive());
        let Ok(mut table) = slots.lock() else {
            continue;
        };
        for (idx, entry) in table.iter_mut().enumerate() {
            let Some(slot) = entry else { continue };
            let wanted = match msg.target {
                SendTarget::All => true,
                SendTarget::One(client) => client as usize == idx,
            };
            if !wanted {
                continue;
            }
            if slot.sender.is_closed() {
                continue;
            }
            if let Err(e) = slot.sender.send(FrameType::Text(false), msg.text.as_bytes()) {
                warn!("ws: send to client {idx} failed ({e})");
            }
        }
    }
}

// ── Static dashboard files ───────────────────────────────────

fn register_static_files(server: &mut EspHttpServer<'static>) -> anyhow::Result<()> {
    server.fn_handler("/*", Method::Get, |req| -> anyhow::Result<()> {
        let uri = req.uri();
        let path = uri.split('?').next().unwrap_or(uri);
        let path = if path == "/" { "/index.html" } else { path };

        // Reject traversal before touching the filesystem.
        if path.contains("..") {
            req.into_status_response(400)?.write_all(b"Not found")?;
            return Ok(());
        }

        let mut full = heapless::String::<128>::new();
        if core::fmt::write(&mut full, format_args!("/spiffs{path}")).is_err() {
            req.into_status_response(400)?.write_all(b"Not found")?;
            return Ok(());
        }

        match std::fs::read(full.as_str()) {
            Ok(body) => {
                let mut resp = req.into_response(
                    200,
                    Some("OK"),
                    &[("Content-Type", content_type(path))],
                )?;
                resp.write_all(&body)?;
            }
            Err(_) => {
                warn!("http: no file for {path}");
                req.into_status_response(400)?.write_all(b"Not found")?;
            }
        }
        Ok(())
    })?;
    Ok(())
}

fn content_type(path: &str) -> &'static str {
    match path.rsplit('.').next() {
        Some("html") => "text/html",
        Some("css") => "text/css",
        Some("js") => "application/javascript",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("ico") => "image/x-icon",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
