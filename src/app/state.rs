//! Device state and its single-writer store.
//!
//! [`StateStore`] owns the one authoritative [`DeviceState`]. Only the
//! control loop holds it, so no locking is involved. The store decides
//! whether a new reading is a change; emitting the notification is the
//! caller's job.

use serde::Serialize;

/// Everything the controller can observe or set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DeviceState {
    /// °C
    pub temperature: f32,
    /// %RH
    pub humidity: f32,
    /// Unitless estimate from the dust sensor.
    pub air_quality: i32,
    /// Fan follows air quality when set.
    pub fan_auto: bool,
    /// Manual fan switch; only consulted when `fan_auto` is false.
    pub fan_on: bool,
}

impl Default for DeviceState {
    fn default() -> Self {
        Self {
            temperature: 24.0,
            humidity: 50.0,
            air_quality: 10,
            fan_auto: true,
            fan_on: false,
        }
    }
}

/// One fresh reading, produced per poll and consumed immediately.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensorSample {
    Temperature(f32),
    Humidity(f32),
    AirQuality(i32),
}

/// Which sensor channel a sample or fault belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SensorKind {
    Temperature = 0b001,
    Humidity = 0b010,
    AirQuality = 0b100,
}

impl SensorKind {
    /// Bit for this channel in a fault mask.
    pub const fn mask(self) -> u8 {
        self as u8
    }
}

impl SensorSample {
    pub fn kind(&self) -> SensorKind {
        match self {
            Self::Temperature(_) => SensorKind::Temperature,
            Self::Humidity(_) => SensorKind::Humidity,
            Self::AirQuality(_) => SensorKind::AirQuality,
        }
    }
}

/// Owner of the live [`DeviceState`].
pub struct StateStore {
    state: DeviceState,
    /// Float changes smaller than this are not commits (0 = exact compare).
    deadband: f32,
}

impl StateStore {
    pub fn new(deadband: f32) -> Self {
        Self::with_state(DeviceState::default(), deadband)
    }

    pub fn with_state(state: DeviceState, deadband: f32) -> Self {
        Self { state, deadband }
    }

    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    /// Commit `sample` if it differs from the stored value.
    ///
    /// Returns `true` when the store changed. NaN never commits.
    pub fn update_if_changed(&mut self, sample: SensorSample) -> bool {
        match sample {
            SensorSample::Temperature(v) => {
                Self::commit_float(&mut self.state.temperature, v, self.deadband)
            }
            SensorSample::Humidity(v) => {
                Self::commit_float(&mut self.state.humidity, v, self.deadband)
            }
            SensorSample::AirQuality(v) => {
                if self.state.air_quality == v {
                    return false;
                }
                self.state.air_quality = v;
                true
            }
        }
    }

    fn commit_float(slot: &mut f32, value: f32, deadband: f32) -> bool {
        if value.is_nan() {
            return false;
        }
        let unchanged = if deadband > 0.0 {
            (value - *slot).abs() < deadband
        } else {
            value == *slot
        };
        if unchanged {
            return false;
        }
        *slot = value;
        true
    }

    pub fn set_fan_auto(&mut self, auto: bool) {
        self.state.fan_auto = auto;
    }

    pub fn set_fan_on(&mut self, on: bool) {
        self.state.fan_on = on;
    }
}
