//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the sensor hub and the actuator drivers, exposing them through
//! [`SensorPort`] and [`ActuatorPort`]. On non-espidf targets the
//! underlying drivers use cfg-gated simulation stubs.

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::control::thresholds::AirQualityLevel;
use crate::drivers::fan::FanRelay;
use crate::drivers::status_led::StatusLeds;
use crate::error::SensorError;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<S> {
    sensors: S,
    leds: StatusLeds,
    fan: FanRelay,
}

impl<S: SensorPort> HardwareAdapter<S> {
    pub fn new(sensors: S, leds: StatusLeds, fan: FanRelay) -> Self {
        Self { sensors, leds, fan }
    }

    pub fn leds(&self) -> &StatusLeds {
        &self.leds
    }

    pub fn fan(&self) -> &FanRelay {
        &self.fan
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<S: SensorPort> SensorPort for HardwareAdapter<S> {
    fn read_temperature_c(&mut self) -> Result<f32, SensorError> {
        self.sensors.read_temperature_c()
    }

    fn read_humidity_pct(&mut self) -> Result<f32, SensorError> {
        self.sensors.read_humidity_pct()
    }

    fn read_analog_raw(&mut self) -> Result<u16, SensorError> {
        self.sensors.read_analog_raw()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<S: SensorPort> ActuatorPort for HardwareAdapter<S> {
    fn show_level(&mut self, level: AirQualityLevel) {
        self.leds.show(level);
    }

    fn set_fan(&mut self, on: bool) {
        if on != self.fan.is_on() {
            log::info!("FAN | relay {}", if on { "on" } else { "off" });
        }
        self.fan.set(on);
    }

    fn all_off(&mut self) {
        self.leds.off();
        self.fan.set(false);
    }
}
