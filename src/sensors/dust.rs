//! Optical dust sensor (GP2Y1010-style) driver.
//!
//! The sensor's IR emitter is pulsed through an active-LOW drive line and
//! the analog output is only valid inside a short window after the pulse
//! starts. One sample is:
//!
//! ```text
//! drive  ‾‾‾‾\_____________/‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾
//!             280µs  ADC  40µs         9680µs
//! ```
//!
//! The timing is a property of the part, not a tunable.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::error::SensorError;

/// Drive LOW → ADC sample.
pub const SAMPLE_DELAY_US: u32 = 280;
/// ADC sample → drive HIGH.
pub const PULSE_TAIL_US: u32 = 40;
/// Drive HIGH → end of cycle.
pub const CYCLE_REST_US: u32 = 9680;

/// One-shot analog input returning raw converter counts.
pub trait AnalogRead {
    fn read_raw(&mut self) -> Result<u16, SensorError>;
}

pub struct DustSensor<H, A> {
    drive: H,
    adc: A,
    /// Counts at or above this are impossible for the configured converter.
    full_scale: u16,
}

impl<H: OutputPin, A: AnalogRead> DustSensor<H, A> {
    pub fn new(drive: H, adc: A, full_scale: u16) -> Self {
        Self { drive, adc, full_scale }
    }

    /// Run one pulse cycle and return the raw count.
    ///
    /// The drive line is released even when the conversion fails.
    pub fn sample(&mut self, delay: &mut impl DelayNs) -> Result<u16, SensorError> {
        self.drive.set_low().map_err(|_| SensorError::GpioFailed)?;
        delay.delay_us(SAMPLE_DELAY_US);
        let raw = self.adc.read_raw();
        delay.delay_us(PULSE_TAIL_US);
        self.drive.set_high().map_err(|_| SensorError::GpioFailed)?;
        delay.delay_us(CYCLE_REST_US);

        let raw = raw?;
        if raw >= self.full_scale {
            return Err(SensorError::OutOfRange);
        }
        Ok(raw)
    }
}
