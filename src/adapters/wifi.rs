//! WiFi station-mode adapter.
//!
//! Implements [`ConnectivityPort`], the hexagonal boundary for network
//! connectivity.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver calls via `esp_idf_svc::wifi`.
//! - **all other targets**: simulation stubs for host-side tests.
//!
//! ## Link loss
//!
//! There is no backoff schedule. When [`poll`](ConnectivityPort::poll)
//! notices the association dropped it asks the driver to re-associate
//! once and then waits for the driver to report the link back up.

use core::fmt;
use log::{info, warn};

#[cfg(target_os = "espidf")]
use esp_idf_svc::wifi::{AuthMethod, ClientConfiguration, Configuration, EspWifi};

// ───────────────────────────────────────────────────────────────
// Port trait
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityError {
    NoCredentials,
    InvalidSsid,
    InvalidPassword,
    ConnectionFailed,
    ScanFailed,
    /// No radio driver has been attached.
    NoDriver,
}

impl fmt::Display for ConnectivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCredentials => write!(f, "no WiFi credentials configured"),
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)"),
            Self::ConnectionFailed => write!(f, "WiFi connection failed"),
            Self::ScanFailed => write!(f, "WiFi scan failed"),
            Self::NoDriver => write!(f, "WiFi driver not attached"),
        }
    }
}

impl core::error::Error for ConnectivityError {}

/// Most access points reported by [`ConnectivityPort::scan`].
pub const MAX_SCAN_RESULTS: usize = 16;

/// One access point seen during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEntry {
    pub ssid: heapless::String<32>,
    /// dBm
    pub rssi: i8,
}

pub type ScanResults = heapless::Vec<ScanEntry, MAX_SCAN_RESULTS>;

pub trait ConnectivityPort {
    fn set_credentials(&mut self, ssid: &str, password: &str) -> Result<(), ConnectivityError>;
    /// Start associating. Returns once the request is issued; poll
    /// [`is_connected`](Self::is_connected) for the outcome.
    fn connect(&mut self) -> Result<(), ConnectivityError>;
    fn is_connected(&self) -> bool;
    /// Track link transitions. Call once per loop pass.
    fn poll(&mut self);
    fn rssi(&self) -> Option<i8>;
    /// Visible networks, strongest first.
    fn scan(&mut self) -> Result<ScanResults, ConnectivityError>;
}

// ───────────────────────────────────────────────────────────────
// Connection state
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiState {
    Disconnected,
    Connecting,
    Connected,
    /// Was connected; re-association requested.
    Lost,
}

// ───────────────────────────────────────────────────────────────
// Credentials
// ───────────────────────────────────────────────────────────────

/// Station credentials, checked against the 802.11 / WPA2 limits on entry.
/// An empty password selects an open network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    ssid: heapless::String<32>,
    password: heapless::String<64>,
}

impl Credentials {
    pub fn new(ssid: &str, password: &str) -> Result<Self, ConnectivityError> {
        let printable = ssid.bytes().all(|b| (0x20..=0x7E).contains(&b));
        if ssid.is_empty() || !printable {
            return Err(ConnectivityError::InvalidSsid);
        }
        if !password.is_empty() && password.len() < 8 {
            return Err(ConnectivityError::InvalidPassword);
        }
        let mut out = Self { ssid: heapless::String::new(), password: heapless::String::new() };
        out.ssid.push_str(ssid).map_err(|_| ConnectivityError::InvalidSsid)?;
        out.password.push_str(password).map_err(|_| ConnectivityError::InvalidPassword)?;
        Ok(out)
    }

    pub fn ssid(&self) -> &str {
        &self.ssid
    }

    pub fn is_open(&self) -> bool {
        self.password.is_empty()
    }
}

// ───────────────────────────────────────────────────────────────
// WiFi adapter
// ───────────────────────────────────────────────────────────────

pub struct WifiAdapter {
    state: WifiState,
    credentials: Option<Credentials>,
    last_rssi: Option<i8>,
    #[cfg(target_os = "espidf")]
    driver: Option<EspWifi<'static>>,
    /// Simulation: whether the pretend access point is reachable.
    #[cfg(not(target_os = "espidf"))]
    sim_link_up: bool,
}

impl Default for WifiAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl WifiAdapter {
    pub fn new() -> Self {
        Self {
            state: WifiState::Disconnected,
            credentials: None,
            last_rssi: None,
            #[cfg(target_os = "espidf")]
            driver: None,
            #[cfg(not(target_os = "espidf"))]
            sim_link_up: true,
        }
    }

    pub fn state(&self) -> WifiState {
        self.state
    }

    /// Hand over the radio driver built in `main`.
    #[cfg(target_os = "espidf")]
    pub fn attach(&mut self, driver: EspWifi<'static>) {
        self.driver = Some(driver);
    }

    /// Simulation: make the access point reachable or not.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_set_link(&mut self, up: bool) {
        self.sim_link_up = up;
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_connect(&mut self, creds: &Credentials) -> Result<(), ConnectivityError> {
        let wifi = self.driver.as_mut().ok_or(ConnectivityError::NoDriver)?;
        let auth_method = if creds.is_open() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        let conf = Configuration::Client(ClientConfiguration {
            ssid: creds
                .ssid
                .as_str()
                .try_into()
                .map_err(|_| ConnectivityError::InvalidSsid)?,
            password: creds
                .password
                .as_str()
                .try_into()
                .map_err(|_| ConnectivityError::InvalidPassword)?,
            auth_method,
            ..Default::default()
        });
        wifi.set_configuration(&conf)
            .map_err(|_| ConnectivityError::ConnectionFailed)?;
        if !wifi.is_started().unwrap_or(false) {
            wifi.start().map_err(|_| ConnectivityError::ConnectionFailed)?;
        }
        wifi.connect().map_err(|_| ConnectivityError::ConnectionFailed)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_connect(&mut self, creds: &Credentials) -> Result<(), ConnectivityError> {
        info!("WiFi(sim): associating with '{}'", creds.ssid());
        Ok(())
    }

    // Connected means the interface has an address, not just association.
    #[cfg(target_os = "espidf")]
    fn platform_is_connected(&self) -> bool {
        self.driver
            .as_ref()
            .is_some_and(|wifi| wifi.is_up().unwrap_or(false))
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_is_connected(&self) -> bool {
        self.state != WifiState::Disconnected && self.sim_link_up
    }

    #[cfg(target_os = "espidf")]
    fn platform_rssi(&self) -> Option<i8> {
        use esp_idf_svc::sys::{esp, esp_wifi_sta_get_ap_info, wifi_ap_record_t};

        let mut ap_info = wifi_ap_record_t::default();
        esp!(unsafe { esp_wifi_sta_get_ap_info(&mut ap_info) })
            .ok()
            .map(|()| ap_info.rssi)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_rssi(&self) -> Option<i8> {
        self.platform_is_connected().then_some(-60)
    }

    #[cfg(target_os = "espidf")]
    fn platform_scan(&mut self) -> Result<ScanResults, ConnectivityError> {
        let wifi = self.driver.as_mut().ok_or(ConnectivityError::NoDriver)?;
        if !wifi.is_started().unwrap_or(false) {
            wifi.set_configuration(&Configuration::Client(ClientConfiguration::default()))
                .map_err(|_| ConnectivityError::ScanFailed)?;
            wifi.start().map_err(|_| ConnectivityError::ScanFailed)?;
        }
        let found = wifi.scan().map_err(|_| ConnectivityError::ScanFailed)?;
        let mut out = ScanResults::new();
        for ap in found.iter().take(MAX_SCAN_RESULTS) {
            let mut ssid = heapless::String::new();
            // Both sides are 32 bytes.
            let _ = ssid.push_str(ap.ssid.as_str());
            let _ = out.push(ScanEntry { ssid, rssi: ap.signal_strength });
        }
        Ok(out)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_scan(&mut self) -> Result<ScanResults, ConnectivityError> {
        let mut out = ScanResults::new();
        if self.sim_link_up {
            let mut ssid = heapless::String::new();
            let _ = ssid.push_str("sim-ap");
            let _ = out.push(ScanEntry { ssid, rssi: -60 });
        }
        Ok(out)
    }
}

// ───────────────────────────────────────────────────────────────
// ConnectivityPort
// ───────────────────────────────────────────────────────────────

impl ConnectivityPort for WifiAdapter {
    fn set_credentials(&mut self, ssid: &str, password: &str) -> Result<(), ConnectivityError> {
        let creds = Credentials::new(ssid, password)?;
        info!("WiFi: credentials set (SSID='{}', open={})", creds.ssid(), creds.is_open());
        self.credentials = Some(creds);
        Ok(())
    }

    fn connect(&mut self) -> Result<(), ConnectivityError> {
        let creds = self.credentials.clone().ok_or(ConnectivityError::NoCredentials)?;
        self.state = WifiState::Connecting;
        self.platform_connect(&creds).inspect_err(|_| {
            self.state = WifiState::Disconnected;
        })
    }

    fn is_connected(&self) -> bool {
        self.platform_is_connected()
    }

    fn poll(&mut self) {
        let up = self.platform_is_connected();
        match (self.state, up) {
            (WifiState::Connecting | WifiState::Lost, true) => {
                self.state = WifiState::Connected;
                self.last_rssi = self.platform_rssi();
                info!("WiFi: connected (RSSI={:?})", self.last_rssi);
            }
            (WifiState::Connected, true) => {
                self.last_rssi = self.platform_rssi();
            }
            (WifiState::Connected, false) => {
                warn!("WiFi: connection lost, re-associating");
                self.state = WifiState::Lost;
                self.last_rssi = None;
                if let Some(creds) = self.credentials.clone() {
                    if let Err(e) = self.platform_connect(&creds) {
                        warn!("WiFi: re-associate request failed: {}", e);
                    }
                }
            }
            _ => {}
        }
    }

    fn rssi(&self) -> Option<i8> {
        self.last_rssi
    }

    fn scan(&mut self) -> Result<ScanResults, ConnectivityError> {
        let mut found = self.platform_scan()?;
        found.sort_unstable_by(|a, b| b.rssi.cmp(&a.rssi));
        Ok(found)
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
