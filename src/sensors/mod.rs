//! Sensor subsystem: individual drivers and the aggregating [`SensorHub`].
//!
//! The hub owns the drivers plus the delay and clock they need, and
//! exposes them to the application through [`SensorPort`]. Each read is one
//! explicit `Result`; the service decides what a failure means.

pub mod air_quality;
pub mod dht;
pub mod dust;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::app::ports::{SensorPort, TimePort};
use crate::error::SensorError;
use dht::{ClimateDriver, DhtSensor};
use dust::{AnalogRead, DustSensor};

/// Aggregates the climate and dust sensors.
pub struct SensorHub<C, H, A, D, T> {
    pub climate: DhtSensor<C>,
    pub dust: DustSensor<H, A>,
    delay: D,
    clock: T,
}

impl<C, H, A, D, T> SensorHub<C, H, A, D, T>
where
    C: ClimateDriver,
    H: OutputPin,
    A: AnalogRead,
    D: DelayNs,
    T: TimePort,
{
    /// Pass in pre-built drivers (built in main where peripheral ownership
    /// is established).
    pub fn new(climate: DhtSensor<C>, dust: DustSensor<H, A>, delay: D, clock: T) -> Self {
        Self { climate, dust, delay, clock }
    }
}

impl<C, H, A, D, T> SensorPort for SensorHub<C, H, A, D, T>
where
    C: ClimateDriver,
    H: OutputPin,
    A: AnalogRead,
    D: DelayNs,
    T: TimePort,
{
    fn read_temperature_c(&mut self) -> Result<f32, SensorError> {
        let now = self.clock.uptime_ms();
        self.climate.read(now).map(|r| r.temperature_c)
    }

    // Shares the cached DHT transaction with the temperature read.
    fn read_humidity_pct(&mut self) -> Result<f32, SensorError> {
        let now = self.clock.uptime_ms();
        self.climate.read(now).map(|r| r.humidity_pct)
    }

    fn read_analog_raw(&mut self) -> Result<u16, SensorError> {
        self.dust.sample(&mut self.delay)
    }
}
