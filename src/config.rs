//! System configuration parameters
//!
//! Every tunable lives here. Values are fixed at compile time: defaults below,
//! optionally overridden by a JSON blob in the `PURIFIER_CONFIG` build-time
//! environment variable. Network settings come from `WIFI_SSID`, `WIFI_PASS`,
//! `WS_HOST`, `WS_PORT` and `WS_PATH` (see `build.rs`).

use core::fmt;

use serde::{Deserialize, Serialize};

/// Which DHT part is wired to the climate pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClimateSensorModel {
    Dht11,
    Dht22,
}

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Analog front end ---
    /// ADC reference voltage (V)
    pub adc_vref: f32,
    /// ADC full-scale count (1024 for a 10-bit converter)
    pub adc_full_scale: u16,

    // --- Air-quality model ---
    /// Below this voltage the estimate is forced to 0
    pub aq_floor_voltage: f32,
    /// Linear model slope (index per volt)
    pub aq_slope: f32,
    /// Linear model offset subtracted after scaling
    pub aq_intercept: f32,
    /// Minimum time between dust-sensor samples (milliseconds)
    pub aq_sample_interval_ms: u32,

    // --- Thresholds ---
    /// Readings below this light the green LED
    pub led_green_below: i32,
    /// Readings below this (and not green) light the yellow LED
    pub led_yellow_below: i32,
    /// In auto mode the fan runs at or above this reading
    pub fan_auto_threshold: i32,

    // --- Change detection / wire format ---
    /// Float dead-band for temperature/humidity change detection (0 = exact)
    pub change_deadband: f32,
    /// Decimal places for float values on the wire
    pub float_decimals: u8,
    /// Send temperature changes under the `humidity` tag like the first firmware did
    pub legacy_temperature_tag: bool,

    // --- Peripherals ---
    pub climate_sensor: ClimateSensorModel,
    /// Rewrite the LCD with live readings instead of the static banner
    pub display_live_values: bool,
    /// Log visible WiFi networks before joining
    pub scan_on_boot: bool,

    // --- Timing ---
    /// Delay between connect polls during startup (milliseconds)
    pub connect_retry_ms: u32,
    /// Pause after a socket disconnect event (milliseconds)
    pub disconnect_pause_ms: u32,
    /// Task watchdog timeout (milliseconds)
    pub watchdog_timeout_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // 5 V reference, 10-bit ADC
            adc_vref: 5.0,
            adc_full_scale: 1024,

            aq_floor_voltage: 0.6,
            aq_slope: 172.0,
            aq_intercept: 103.2,
            aq_sample_interval_ms: 1000,

            led_green_below: 50,
            led_yellow_below: 80,
            fan_auto_threshold: 50,

            change_deadband: 0.0,
            float_decimals: 2,
            legacy_temperature_tag: false,

            climate_sensor: ClimateSensorModel::Dht11,
            display_live_values: false,
            scan_on_boot: false,

            connect_retry_ms: 500,
            disconnect_pause_ms: 5000,
            watchdog_timeout_ms: 30_000,
        }
    }
}

impl SystemConfig {
    /// Parse and validate a JSON override. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|_| ConfigError::Corrupted)?;
        config.validate()?;
        Ok(config)
    }

    /// The configuration baked in at build time.
    ///
    /// An invalid override is reported and replaced by the defaults so the
    /// device still boots.
    pub fn compiled() -> Self {
        match option_env!("PURIFIER_CONFIG") {
            Some(json) => Self::from_json(json).unwrap_or_else(|e| {
                log::warn!("PURIFIER_CONFIG rejected ({}), using defaults", e);
                Self::default()
            }),
            None => Self::default(),
        }
    }

    /// Reject out-of-range values rather than clamping them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.adc_vref.is_nan() || self.adc_vref <= 0.0 {
            return Err(ConfigError::ValidationFailed("adc_vref must be positive"));
        }
        if self.adc_full_scale == 0 {
            return Err(ConfigError::ValidationFailed("adc_full_scale must be non-zero"));
        }
        if !self.aq_floor_voltage.is_finite()
            || !self.aq_slope.is_finite()
            || !self.aq_intercept.is_finite()
        {
            return Err(ConfigError::ValidationFailed("air-quality model must be finite"));
        }
        if self.led_green_below > self.led_yellow_below {
            return Err(ConfigError::ValidationFailed(
                "led_green_below must not exceed led_yellow_below",
            ));
        }
        if self.change_deadband.is_nan() || self.change_deadband < 0.0 {
            return Err(ConfigError::ValidationFailed("change_deadband must be >= 0"));
        }
        if self.float_decimals > 6 {
            return Err(ConfigError::ValidationFailed("float_decimals must be <= 6"));
        }
        if self.connect_retry_ms == 0 {
            return Err(ConfigError::ValidationFailed("connect_retry_ms must be non-zero"));
        }
        if self.watchdog_timeout_ms <= self.disconnect_pause_ms {
            return Err(ConfigError::ValidationFailed(
                "watchdog_timeout_ms must exceed disconnect_pause_ms",
            ));
        }
        Ok(())
    }
}

/// Network endpoints and credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkConfig {
    pub wifi_ssid: &'static str,
    pub wifi_password: &'static str,
    pub ws_host: &'static str,
    pub ws_port: u16,
    pub ws_path: &'static str,
    /// Sent verbatim once per socket connection
    pub auth_tag: &'static str,
}

impl LinkConfig {
    pub const DEFAULT_PORT: u16 = 80;

    /// Endpoints from the build-time environment.
    pub fn compiled() -> Self {
        let ws_port = option_env!("WS_PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(Self::DEFAULT_PORT);
        Self {
            wifi_ssid: option_env!("WIFI_SSID").unwrap_or(""),
            wifi_password: option_env!("WIFI_PASS").unwrap_or(""),
            ws_host: option_env!("WS_HOST").unwrap_or("172.20.10.2"),
            ws_port,
            ws_path: option_env!("WS_PATH").unwrap_or("/ws"),
            auth_tag: "auth:arduino",
        }
    }
}

/// Errors from loading or validating configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The override could not be deserialized.
    Corrupted,
    /// A field failed range validation.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl core::error::Error for ConfigError {}
