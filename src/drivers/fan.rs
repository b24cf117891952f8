//! Fan relay driver. Single GPIO, active HIGH.
//!
//! The driver is a dumb actuator; the auto/manual decision lives in
//! [`Thresholds::fan_output`](crate::control::thresholds::Thresholds::fan_output).

use crate::drivers::hw_init;
use crate::pins;

pub struct FanRelay {
    on: bool,
}

impl Default for FanRelay {
    fn default() -> Self {
        Self::new()
    }
}

impl FanRelay {
    pub fn new() -> Self {
        Self { on: false }
    }

    pub fn set(&mut self, on: bool) {
        hw_init::gpio_write(pins::FAN_GPIO, on);
        self.on = on;
    }

    pub fn is_on(&self) -> bool {
        self.on
    }
}
