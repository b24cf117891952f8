//! Dust-sensor voltage → air-quality index.
//!
//! Linear model with a floor: below `floor_voltage` the air is treated as
//! clean (0); above it the index is `round(slope * v - intercept)`.
//! Rounding is half away from zero and the result never goes negative.

use crate::config::SystemConfig;

#[derive(Debug, Clone, Copy)]
pub struct AirQualityEstimator {
    vref: f32,
    full_scale: f32,
    floor_voltage: f32,
    slope: f32,
    intercept: f32,
}

impl Default for AirQualityEstimator {
    fn default() -> Self {
        Self::from_config(&SystemConfig::default())
    }
}

impl AirQualityEstimator {
    pub fn from_config(config: &SystemConfig) -> Self {
        Self {
            vref: config.adc_vref,
            full_scale: config.adc_full_scale as f32,
            floor_voltage: config.aq_floor_voltage,
            slope: config.aq_slope,
            intercept: config.aq_intercept,
        }
    }

    /// ADC counts → volts.
    pub fn voltage(&self, raw: u16) -> f32 {
        raw as f32 * self.vref / self.full_scale
    }

    /// ADC counts → index.
    pub fn estimate(&self, raw: u16) -> i32 {
        self.estimate_voltage(self.voltage(raw))
    }

    /// Volts → index.
    pub fn estimate_voltage(&self, voltage: f32) -> i32 {
        if voltage < self.floor_voltage {
            return 0;
        }
        let index = (self.slope * voltage - self.intercept).round();
        (index as i32).max(0)
    }
}
