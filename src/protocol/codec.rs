//! Colon-delimited text codec.
//!
//! Wire format, device → controller (one frame per field):
//! ```text
//! from_arduino:<field>:<value>
//! ```
//! Fields are `temperature`, `humidity` (floats, fixed decimals),
//! `air_quality` (integer), `is_fan_auto` and `is_fan_on` (`true`/`false`).
//!
//! Controller → device frames are bare command words matched exactly,
//! see [`Command::decode`]. No tokenizing, no trimming.

use core::fmt::{self, Write};

use crate::app::state::{DeviceState, SensorSample};
use crate::config::SystemConfig;

/// Namespace prefix on every outbound frame.
pub const NAMESPACE: &str = "from_arduino";

/// Capacity of an encoded frame; fits the prefix plus any `f32` at six decimals.
pub const MAX_OUTBOUND_LEN: usize = 96;

/// Encoded outbound frame.
pub type OutboundFrame = heapless::String<MAX_OUTBOUND_LEN>;

// ───────────────────────────────────────────────────────────────
// Outbound
// ───────────────────────────────────────────────────────────────

/// One device → controller notification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outbound {
    Temperature(f32),
    Humidity(f32),
    AirQuality(i32),
    FanAuto(bool),
    FanOn(bool),
}

impl Outbound {
    /// Field tag as it appears on the wire.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Temperature(_) => "temperature",
            Self::Humidity(_) => "humidity",
            Self::AirQuality(_) => "air_quality",
            Self::FanAuto(_) => "is_fan_auto",
            Self::FanOn(_) => "is_fan_on",
        }
    }

    /// The full state in reply order: temperature, humidity, air quality,
    /// fan mode, fan switch.
    pub fn snapshot(state: &DeviceState) -> [Self; 5] {
        [
            Self::Temperature(state.temperature),
            Self::Humidity(state.humidity),
            Self::AirQuality(state.air_quality),
            Self::FanAuto(state.fan_auto),
            Self::FanOn(state.fan_on),
        ]
    }
}

impl From<SensorSample> for Outbound {
    fn from(sample: SensorSample) -> Self {
        match sample {
            SensorSample::Temperature(v) => Self::Temperature(v),
            SensorSample::Humidity(v) => Self::Humidity(v),
            SensorSample::AirQuality(v) => Self::AirQuality(v),
        }
    }
}

/// The encoded frame did not fit [`MAX_OUTBOUND_LEN`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameOverflow;

impl fmt::Display for FrameOverflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frame exceeds {} bytes", MAX_OUTBOUND_LEN)
    }
}

/// Outbound encoder with the wire options from [`SystemConfig`].
#[derive(Debug, Clone, Copy)]
pub struct Encoder {
    decimals: usize,
    legacy_temperature_tag: bool,
}

impl Encoder {
    pub fn new(decimals: u8, legacy_temperature_tag: bool) -> Self {
        Self {
            decimals: decimals as usize,
            legacy_temperature_tag,
        }
    }

    pub fn from_config(config: &SystemConfig) -> Self {
        Self::new(config.float_decimals, config.legacy_temperature_tag)
    }

    /// Encode a frame with its own field tag.
    pub fn encode(&self, msg: &Outbound) -> Result<OutboundFrame, FrameOverflow> {
        self.encode_tagged(msg.field(), msg)
    }

    /// Encode a change notification.
    ///
    /// Identical to [`encode`](Self::encode) unless the legacy tag is enabled,
    /// in which case temperature changes go out under `humidity` as the
    /// first controller build expects.
    pub fn encode_change(&self, msg: &Outbound) -> Result<OutboundFrame, FrameOverflow> {
        match msg {
            Outbound::Temperature(_) if self.legacy_temperature_tag => {
                self.encode_tagged("humidity", msg)
            }
            _ => self.encode(msg),
        }
    }

    fn encode_tagged(&self, tag: &str, msg: &Outbound) -> Result<OutboundFrame, FrameOverflow> {
        let mut out = OutboundFrame::new();
        let res = match *msg {
            Outbound::Temperature(v) | Outbound::Humidity(v) => {
                write!(out, "{}:{}:{:.*}", NAMESPACE, tag, self.decimals, v)
            }
            Outbound::AirQuality(v) => write!(out, "{}:{}:{}", NAMESPACE, tag, v),
            Outbound::FanAuto(b) | Outbound::FanOn(b) => {
                write!(out, "{}:{}:{}", NAMESPACE, tag, b)
            }
        };
        res.map_err(|_| FrameOverflow)?;
        Ok(out)
    }
}

// ───────────────────────────────────────────────────────────────
// Inbound
// ───────────────────────────────────────────────────────────────

/// Controller → device commands. The set is closed; anything else is noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Reply with the full state snapshot.
    Request,
    /// Derive the fan from air quality.
    AutoOn,
    /// Drive the fan from the manual switch.
    AutoOff,
    /// Manual switch on.
    FanOn,
    /// Manual switch off.
    FanOff,
}

impl Command {
    pub const ALL: [Self; 5] = [
        Self::Request,
        Self::AutoOn,
        Self::AutoOff,
        Self::FanOn,
        Self::FanOff,
    ];

    /// Exact-match decode. `None` for anything outside the command set.
    pub fn decode(payload: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == payload)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Request => "request",
            Self::AutoOn => "auto_on",
            Self::AutoOff => "auto_off",
            Self::FanOn => "fan_on",
            Self::FanOff => "fan_off",
        }
    }
}
