//! Error types for the purifier firmware.
//!
//! Every subsystem has its own small `Copy` error enum implementing
//! `core::error::Error`, so the startup path in `main` can lift any of them
//! into `anyhow` with `?`. After startup nothing is fatal: the control loop
//! logs these and carries on.

use core::fmt;


// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

/// Explicit result of a failed sensor read. The control loop keeps the last
/// good value when it sees one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The sensor did not answer within the protocol's timing window.
    Timeout,
    /// A DHT frame arrived but its checksum byte did not match.
    Checksum,
    /// ADC conversion failed.
    AdcReadFailed,
    /// A GPIO used by the sensor could not be driven or sampled.
    GpioFailed,
    /// The value decoded but is outside the physically plausible range.
    OutOfRange,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "sensor timeout"),
            Self::Checksum => write!(f, "checksum mismatch"),
            Self::AdcReadFailed => write!(f, "ADC read failed"),
            Self::GpioFailed => write!(f, "GPIO access failed"),
            Self::OutOfRange => write!(f, "reading out of range"),
        }
    }
}

impl core::error::Error for SensorError {}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// The session could not be opened.
    ConnectFailed,
    /// A send was attempted while the session is down.
    NotConnected,
    /// The underlying client rejected the frame.
    SendFailed,
    /// Host, path or payload does not fit the fixed-size buffers.
    TooLong,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectFailed => write!(f, "connect failed"),
            Self::NotConnected => write!(f, "not connected"),
            Self::SendFailed => write!(f, "send failed"),
            Self::TooLong => write!(f, "value too long"),
        }
    }
}

impl core::error::Error for TransportError {}

// ---------------------------------------------------------------------------
// Display errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayError {
    /// The I2C expander NACKed or the bus errored.
    Bus,
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus => write!(f, "I2C bus error"),
        }
    }
}

impl core::error::Error for DisplayError {}
