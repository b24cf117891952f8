//! Three discrete air-quality LEDs (red / yellow / green), active HIGH.
//!
//! Exactly one is lit at a time. All three lines are rewritten on every
//! update so a glitched output cannot stick.
//!
//! On ESP-IDF: drives the GPIOs via hw_init. On host/test: the sim GPIO
//! mirror plus the in-memory `current` level.

use crate::control::thresholds::AirQualityLevel;
use crate::drivers::hw_init;
use crate::pins;

pub struct StatusLeds {
    current: Option<AirQualityLevel>,
}

impl Default for StatusLeds {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusLeds {
    pub fn new() -> Self {
        Self { current: None }
    }

    pub fn show(&mut self, level: AirQualityLevel) {
        hw_init::gpio_write(pins::LED_RED_GPIO, level == AirQualityLevel::Poor);
        hw_init::gpio_write(pins::LED_YELLOW_GPIO, level == AirQualityLevel::Moderate);
        hw_init::gpio_write(pins::LED_GREEN_GPIO, level == AirQualityLevel::Good);
        self.current = Some(level);
    }

    pub fn off(&mut self) {
        hw_init::gpio_write(pins::LED_RED_GPIO, false);
        hw_init::gpio_write(pins::LED_YELLOW_GPIO, false);
        hw_init::gpio_write(pins::LED_GREEN_GPIO, false);
        self.current = None;
    }

    /// Level currently shown, `None` when dark.
    pub fn current(&self) -> Option<AirQualityLevel> {
        self.current
    }
}
