//! WiFi station-mode adapter with fixed addressing.
//!
//! The device joins the configured AP as a station with a static IP so
//! the dashboard lives at a known URL without DHCP reservations.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver calls via
//!   `esp_idf_svc::wifi`, with the STA netif pre-configured for the
//!   fixed address.
//! - **all other targets**: simulation stubs for host-side tests.
//!
//! ## Reconnection policy
//!
//! On disconnect the adapter retries from `poll()` with exponential
//! backoff (2 s → 4 s → 8 s … capped at 60 s).

use log::{error, info, warn};

use crate::config::NetworkConfig;
use crate::CommsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiState {
    Disconnected,
    Connecting,
    Connected,
    Reconnecting { attempt: u32 },
}

const INITIAL_BACKOFF_SECS: u32 = 2;
const MAX_BACKOFF_SECS: u32 = 60;

pub struct WifiAdapter {
    config: NetworkConfig,
    state: WifiState,
    backoff_secs: u32,
    /// Uptime seconds at which the next reconnect attempt is allowed.
    next_retry_at: u32,
    #[cfg(target_os = "espidf")]
    wifi: esp_idf_svc::wifi::EspWifi<'static>,
    #[cfg(not(target_os = "espidf"))]
    sim_link_up: bool,
}

impl WifiAdapter {
    #[cfg(target_os = "espidf")]
    pub fn new(
        modem: esp_idf_hal::modem::Modem,
        sysloop: esp_idf_svc::eventloop::EspSystemEventLoop,
        nvs: esp_idf_svc::nvs::EspDefaultNvsPartition,
        config: NetworkConfig,
    ) -> Result<Self, CommsError> {
        use esp_idf_svc::ipv4;
        use esp_idf_svc::netif::{EspNetif, NetifConfiguration, NetifStack};
        use esp_idf_svc::wifi::{EspWifi, WifiDriver};

        let driver = WifiDriver::new(modem, sysloop, Some(nvs)).map_err(|e| {
            error!("wifi: driver init failed ({e})");
            CommsError::WifiConnectFailed
        })?;

        // STA netif with the fixed address baked in; no DHCP client.
        let sta_conf = NetifConfiguration {
            ip_configuration: Some(ipv4::Configuration::Client(
                ipv4::ClientConfiguration::Fixed(ipv4::ClientSettings {
                    ip: config.ip,
                    subnet: ipv4::Subnet {
                        gateway: config.gateway,
                        mask: ipv4::Mask(config.prefix_len),
                    },
                    dns: Some(config.gateway),
                    secondary_dns: None,
                }),
            )),
            ..NetifConfiguration::wifi_default_client()
        };

        let wifi = EspWifi::wrap_all(
            driver,
            EspNetif::new_with_conf(&sta_conf).map_err(|e| {
                error!("wifi: netif setup failed ({e})");
                CommsError::WifiConnectFailed
            })?,
            EspNetif::new(NetifStack::Ap).map_err(|e| {
                error!("wifi: netif setup failed ({e})");
                CommsError::WifiConnectFailed
            })?,
        )
        .map_err(|e| {
            error!("wifi: wrap failed ({e})");
            CommsError::WifiConnectFailed
        })?;

        Ok(Self {
            config,
            state: WifiState::Disconnected,
            backoff_secs: INITIAL_BACKOFF_SECS,
            next_retry_at: 0,
            wifi,
        })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new(config: NetworkConfig) -> Result<Self, CommsError> {
        Ok(Self {
            config,
            state: WifiState::Disconnected,
            backoff_secs: INITIAL_BACKOFF_SECS,
            next_retry_at: 0,
            sim_link_up: false,
        })
    }

    pub fn state(&self) -> WifiState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == WifiState::Connected && self.platform_is_connected()
    }

    /// Join the configured AP. Blocks until the association either
    /// succeeds or fails; IP configuration is instantaneous (static).
    pub fn connect(&mut self) -> Result<(), CommsError> {
        info!(
            "wifi: connecting to '{}' as {} (gw {})",
            self.config.ssid, self.config.ip, self.config.gateway
        );
        self.state = WifiState::Connecting;

        match self.platform_connect() {
            Ok(()) => {
                self.state = WifiState::Connected;
                self.backoff_secs = INITIAL_BACKOFF_SECS;
                info!("wifi: connected, dashboard at http://{}/", self.config.ip);
                Ok(())
            }
            Err(e) => {
                error!("wifi: connect failed");
                self.state = WifiState::Reconnecting { attempt: 0 };
                Err(e)
            }
        }
    }

    pub fn disconnect(&mut self) {
        self.platform_disconnect();
        self.state = WifiState::Disconnected;
        info!("wifi: disconnected");
    }

    /// Drive reconnection. Called from the main loop with the current
    /// uptime so backoff needs no timer of its own.
    pub fn poll(&mut self, uptime_secs: u32) {
        match self.state {
            WifiState::Connected => {
                if !self.platform_is_connected() {
                    warn!("wifi: link lost, entering reconnect");
                    self.state = WifiState::Reconnecting { attempt: 0 };
                    self.next_retry_at = uptime_secs.saturating_add(self.backoff_secs);
                }
            }
            WifiState::Reconnecting { attempt } => {
                if uptime_secs < self.next_retry_at {
                    return;
                }
                info!("wifi: reconnect attempt {attempt} (backoff {}s)", self.backoff_secs);
                match self.platform_connect() {
                    Ok(()) => {
                        self.state = WifiState::Connected;
                        self.backoff_secs = INITIAL_BACKOFF_SECS;
                        info!("wifi: reconnected");
                    }
                    Err(_) => {
                        self.backoff_secs = (self.backoff_secs * 2).min(MAX_BACKOFF_SECS);
                        self.next_retry_at = uptime_secs.saturating_add(self.backoff_secs);
                        self.state = WifiState::Reconnecting { attempt: attempt + 1 };
                    }
                }
            }
            _ => {}
        }
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_connect(&mut self) -> Result<(), CommsError> {
        use esp_idf_svc::wifi::{AuthMethod, ClientConfiguration, Configuration};

        let auth_method = if self.config.password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        let client = ClientConfiguration {
            ssid: self.config.ssid.try_into().map_err(|_| CommsError::WifiConnectFailed)?,
            password: self
                .config
                .password
                .try_into()
                .map_err(|_| CommsError::WifiConnectFailed)?,
            auth_method,
            ..Default::default()
        };

        let step = |r: Result<(), esp_idf_svc::sys::EspError>, what: &str| {
            r.map_err(|e| {
                error!("wifi: {what} failed ({e})");
                CommsError::WifiConnectFailed
            })
        };

        step(self.wifi.set_configuration(&Configuration::Client(client)), "configure")?;
        step(self.wifi.start(), "start")?;
        step(self.wifi.connect(), "connect")?;
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_connect(&mut self) -> Result<(), CommsError> {
        self.sim_link_up = true;
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_disconnect(&mut self) {
        if let Err(e) = self.wifi.disconnect() {
            warn!("wifi: disconnect returned {e}");
        }
        if let Err(e) = self.wifi.stop() {
            warn!("wifi: stop returned {e}");
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_disconnect(&mut self) {
        self.sim_link_up = false;
    }

    #[cfg(target_os = "espidf")]
    fn platform_is_connected(&self) -> bool {
        self.wifi.is_connected().unwrap_or(false)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_is_connected(&self) -> bool {
        self.sim_link_up
    }
}
