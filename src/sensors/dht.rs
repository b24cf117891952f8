//! DHT11 / DHT22 single-wire climate sensor.
//!
//! The wire protocol lives in the `dht11` crate (DHT11) and in
//! `embedded-dht-rs` (DHT22); both verify the frame checksum. On top of
//! their result this module rejects physically implausible values and
//! enforces the part's minimum read interval.
//!
//! The parts refuse to be read faster than once a second (DHT11) or every
//! two seconds (DHT22), so the last result is cached for that long.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal_0_2::blocking::delay::{DelayMs, DelayUs};
use embedded_hal_0_2::digital::v2::{InputPin as InputPin02, OutputPin as OutputPin02};

use crate::config::ClimateSensorModel;
use crate::error::SensorError;

impl ClimateSensorModel {
    /// Minimum spacing between two real bus transactions.
    pub const fn min_interval_ms(self) -> u64 {
        match self {
            Self::Dht11 => 1000,
            Self::Dht22 => 2000,
        }
    }

    /// Plausible temperature range in °C.
    pub const fn temperature_range(self) -> (f32, f32) {
        match self {
            Self::Dht11 => (-20.0, 60.0),
            Self::Dht22 => (-40.0, 80.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateReading {
    pub temperature_c: f32,
    pub humidity_pct: f32,
}

/// One checksummed bus transaction against a climate sensor.
pub trait ClimateDriver {
    fn measure(&mut self) -> Result<ClimateReading, SensorError>;
}

impl<T: ClimateDriver + ?Sized> ClimateDriver for Box<T> {
    fn measure(&mut self) -> Result<ClimateReading, SensorError> {
        (**self).measure()
    }
}

/// Reject readings the part cannot physically produce.
pub fn check_reading(
    model: ClimateSensorModel,
    reading: ClimateReading,
) -> Result<ClimateReading, SensorError> {
    let (t_min, t_max) = model.temperature_range();
    if !(0.0..=100.0).contains(&reading.humidity_pct)
        || !(t_min..=t_max).contains(&reading.temperature_c)
    {
        return Err(SensorError::OutOfRange);
    }
    Ok(reading)
}

/// DHT11 through the `dht11` crate (embedded-hal 0.2 pin and delay).
pub struct Dht11Driver<P, D> {
    device: dht11::Dht11<P>,
    delay: D,
}

impl<P, D, E> Dht11Driver<P, D>
where
    P: InputPin02<Error = E> + OutputPin02<Error = E>,
    D: DelayUs<u16> + DelayMs<u16>,
{
    pub fn new(pin: P, delay: D) -> Self {
        Self { device: dht11::Dht11::new(pin), delay }
    }
}

impl<P, D, E> ClimateDriver for Dht11Driver<P, D>
where
    P: InputPin02<Error = E> + OutputPin02<Error = E>,
    D: DelayUs<u16> + DelayMs<u16>,
{
    fn measure(&mut self) -> Result<ClimateReading, SensorError> {
        match self.device.perform_measurement(&mut self.delay) {
            // Both fields come back in tenths.
            Ok(m) => Ok(ClimateReading {
                temperature_c: f32::from(m.temperature) / 10.0,
                humidity_pct: f32::from(m.humidity) / 10.0,
            }),
            Err(dht11::Error::Timeout) => Err(SensorError::Timeout),
            Err(dht11::Error::CrcMismatch) => Err(SensorError::Checksum),
            Err(dht11::Error::Gpio(_)) => Err(SensorError::GpioFailed),
        }
    }
}

/// DHT22 through `embedded-dht-rs` (embedded-hal 1.0 pin and delay).
pub struct Dht22Driver<P: InputPin + OutputPin, D: DelayNs> {
    device: embedded_dht_rs::dht22::Dht22<P, D>,
}

impl<P: InputPin + OutputPin, D: DelayNs> Dht22Driver<P, D> {
    pub fn new(pin: P, delay: D) -> Self {
        Self { device: embedded_dht_rs::dht22::Dht22::new(pin, delay) }
    }
}

impl<P: InputPin + OutputPin, D: DelayNs> ClimateDriver for Dht22Driver<P, D> {
    fn measure(&mut self) -> Result<ClimateReading, SensorError> {
        match self.device.read() {
            Ok(r) => Ok(ClimateReading { temperature_c: r.temperature, humidity_pct: r.humidity }),
            Err(embedded_dht_rs::SensorError::Timeout) => Err(SensorError::Timeout),
            Err(embedded_dht_rs::SensorError::ChecksumMismatch) => Err(SensorError::Checksum),
            Err(_) => Err(SensorError::GpioFailed),
        }
    }
}

pub struct DhtSensor<C> {
    driver: C,
    model: ClimateSensorModel,
    last: Option<(u64, Result<ClimateReading, SensorError>)>,
}

impl<C: ClimateDriver> DhtSensor<C> {
    pub fn new(driver: C, model: ClimateSensorModel) -> Self {
        Self { driver, model, last: None }
    }

    /// Read temperature and humidity, or return the cached result if the
    /// previous transaction was less than the model's minimum interval ago.
    /// Failures are cached too: hammering a sensor that just failed makes
    /// it worse.
    pub fn read(&mut self, now_ms: u64) -> Result<ClimateReading, SensorError> {
        if let Some((at, cached)) = self.last {
            if now_ms.saturating_sub(at) < self.model.min_interval_ms() {
                return cached;
            }
        }
        let result = self
            .driver
            .measure()
            .and_then(|reading| check_reading(self.model, reading));
        self.last = Some((now_ms, result));
        result
    }
}
