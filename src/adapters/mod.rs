//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements      | Connects to                 |
//! |------------|-----------------|-----------------------------|
//! | `httpd`    | transport       | ESP-IDF HTTP server + WS    |
//! | `log_sink` | EventSink       | Serial log output           |
//! | `spiffs`   | dashboard files | SPIFFS VFS mount            |
//! | `wifi`     | connectivity    | ESP-IDF WiFi STA (fixed IP) |

#[cfg(target_os = "espidf")]
pub mod httpd;
pub mod log_sink;
#[cfg(target_os = "espidf")]
pub mod spiffs;
pub mod wifi;
