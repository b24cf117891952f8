//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ PurifierService (domain)
//! ```
//!
//! Driven adapters (sensors, actuators, display, event sinks, clock)
//! implement these traits. The [`PurifierService`](super::service::PurifierService)
//! consumes them via generics, so the domain core never touches hardware
//! directly. The socket side is [`TextTransport`](crate::protocol::transport::TextTransport).

use crate::control::thresholds::AirQualityLevel;
use crate::error::{DisplayError, SensorError};

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port. Every read is an explicit result; the service keeps
/// the last good value on `Err`.
pub trait SensorPort {
    /// Ambient temperature in °C.
    fn read_temperature_c(&mut self) -> Result<f32, SensorError>;

    /// Relative humidity in %.
    fn read_humidity_pct(&mut self) -> Result<f32, SensorError>;

    /// One pulsed dust-sensor sample in raw ADC counts.
    fn read_analog_raw(&mut self) -> Result<u16, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port. Output failures are the adapter's to report; the
/// control loop never stops for them.
pub trait ActuatorPort {
    /// Light exactly the LED for `level`, turning the other two off.
    fn show_level(&mut self, level: AirQualityLevel);

    /// Drive the fan relay.
    fn set_fan(&mut self, on: bool);

    /// Everything off.
    fn all_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Display port
// ───────────────────────────────────────────────────────────────

/// Two-line character display.
pub trait DisplayPort {
    fn init(&mut self) -> Result<(), DisplayError>;

    /// Replace both lines. Text beyond the display width is cut off.
    fn show_lines(&mut self, top: &str, bottom: &str) -> Result<(), DisplayError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Time port
// ───────────────────────────────────────────────────────────────

/// Monotonic milliseconds since boot.
pub trait TimePort {
    fn uptime_ms(&self) -> u64;
}
