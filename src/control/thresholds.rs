//! Air-quality thresholds → actuator decisions.
//!
//! Both functions are total and pure: the control loop calls them every
//! iteration and hands the result to the actuator port.

use crate::app::state::DeviceState;
use crate::config::SystemConfig;

/// Which status LED is lit. Exactly one is on at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AirQualityLevel {
    /// Green LED.
    Good,
    /// Yellow LED.
    Moderate,
    /// Red LED.
    Poor,
}

/// LED and fan cut-off points, copied out of [`SystemConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub green_below: i32,
    pub yellow_below: i32,
    pub fan_at_or_above: i32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::from_config(&SystemConfig::default())
    }
}

impl Thresholds {
    pub fn from_config(config: &SystemConfig) -> Self {
        Self {
            green_below: config.led_green_below,
            yellow_below: config.led_yellow_below,
            fan_at_or_above: config.fan_auto_threshold,
        }
    }

    /// First match wins, ascending.
    pub fn level(&self, air_quality: i32) -> AirQualityLevel {
        if air_quality < self.green_below {
            AirQualityLevel::Good
        } else if air_quality < self.yellow_below {
            AirQualityLevel::Moderate
        } else {
            AirQualityLevel::Poor
        }
    }

    /// Fan output: derived from air quality in auto mode, else the manual switch.
    pub fn fan_output(&self, state: &DeviceState) -> bool {
        if state.fan_auto {
            state.air_quality >= self.fan_at_or_above
        } else {
            state.fan_on
        }
    }
}
