//! Tank level monitor — firmware entry point.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                  │
//! │                                                           │
//! │  WifiAdapter      HttpTransport      LogEventSink         │
//! │  (STA, fixed IP)  (dashboard + /ws)  (EventSink)          │
//! │                                                           │
//! │  ──────────────── Port Trait Boundary ─────────────────   │
//! │                                                           │
//! │  ┌─────────────────────────────────────────────────────┐  │
//! │  │           AppService (pure logic)                   │  │
//! │  │  sample → convert → broadcast · Set/Get dispatch    │  │
//! │  └─────────────────────────────────────────────────────┘  │
//! │                                                           │
//! │  SensorHub (ultrasonic ×2) · hw_timer (3 s tick)          │
//! └───────────────────────────────────────────────────────────┘
//! ```

use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use log::{info, warn};

use tanklevel::adapters::httpd::HttpTransport;
use tanklevel::adapters::log_sink::LogEventSink;
use tanklevel::adapters::spiffs;
use tanklevel::adapters::wifi::WifiAdapter;
use tanklevel::app::actuators::ActuatorTable;
use tanklevel::app::service::AppService;
use tanklevel::config::{NetworkConfig, TankConfig};
use tanklevel::drivers::hw_timer;
use tanklevel::events::take_sample_due;
use tanklevel::net::channels::{ChannelClientSink, DISCONNECT_CHANNEL, INBOUND_CHANNEL};
use tanklevel::net::router::FrameRouter;
use tanklevel::sensors::SensorHub;

/// Main-loop poll period. Short enough that a 3 s sampling tick is
/// never visibly late, long enough to keep the idle task fed.
const LOOP_DELAY_MS: u32 = 20;

fn uptime_secs() -> u32 {
    // SAFETY: esp_timer_get_time has no preconditions after boot.
    (unsafe { esp_idf_svc::sys::esp_timer_get_time() } / 1_000_000) as u32
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  TankLevel v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    let config = TankConfig::default();
    let network = NetworkConfig::default();

    // ── 2. Dashboard filesystem ───────────────────────────────
    if let Err(e) = spiffs::mount() {
        // The monitor still samples and serves /ws without it.
        warn!("dashboard assets unavailable: {e}");
    }

    // ── 3. Network up ─────────────────────────────────────────
    let mut wifi = WifiAdapter::new(peripherals.modem, sysloop, nvs, network)?;
    if wifi.connect().is_err() {
        warn!("wifi: initial connect failed, will keep retrying");
    }
    let _http = HttpTransport::start()?;

    // ── 4. Sensors + sampling timer ───────────────────────────
    let mut sensors = SensorHub::from_config(&config);
    hw_timer::start(config.sample_interval_secs);

    // ── 5. Application core ───────────────────────────────────
    let mut app = AppService::new(config);
    let mut actuators = ActuatorTable::new();
    let mut clients = ChannelClientSink;
    let mut log_sink = LogEventSink::new();
    let mut router = FrameRouter::new();

    info!("System ready. Entering main loop.");

    // ── 6. Main loop ──────────────────────────────────────────
    loop {
        if take_sample_due() {
            app.run_sample_cycle(&mut sensors, &mut clients, &mut log_sink);
        }

        while let Ok(msg) = INBOUND_CHANNEL.try_receive() {
            if let Some(text) = router.feed(msg.client, msg.info, &msg.payload) {
                app.handle_message(msg.client, &text, &mut actuators, &mut clients, &mut log_sink);
            }
        }

        while let Ok(gone) = DISCONNECT_CHANNEL.try_receive() {
            router.reset_client(gone.client);
        }

        wifi.poll(uptime_secs());

        FreeRtos::delay_ms(LOOP_DELAY_MS);
    }
}
