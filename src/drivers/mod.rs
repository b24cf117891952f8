//! Actuator drivers, hardware initialisation, and peripheral helpers.

pub mod fan;
pub mod hw_init;
pub mod lcd;
pub mod status_led;
pub mod watchdog;
