//! Mock adapters for integration tests.
//!
//! Record every actuator call, sent frame and emitted event so tests can
//! assert on the full history without touching real GPIO or sockets.

use std::cell::Cell;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use embedded_hal::delay::DelayNs;
use purifier::app::events::AppEvent;
use purifier::app::ports::{ActuatorPort, EventSink, SensorPort};
use purifier::control::thresholds::AirQualityLevel;
use purifier::error::{SensorError, TransportError};
use purifier::protocol::transport::{TextTransport, TransportEvent};

// ── Shared sim peripherals ────────────────────────────────────

static SIM_PERIPHERALS: Mutex<()> = Mutex::new(());

/// Serialize tests that drive the process-global sim GPIO and ADC.
pub fn lock_sim_peripherals() -> MutexGuard<'static, ()> {
    SIM_PERIPHERALS.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum ActuatorCall {
    Level(AirQualityLevel),
    Fan(bool),
    AllOff,
}

// ── MockHardware ──────────────────────────────────────────────

/// Sensors return whatever the test put in the fields; actuator calls
/// are appended to `calls`.
pub struct MockHardware {
    pub temperature: Result<f32, SensorError>,
    pub humidity: Result<f32, SensorError>,
    pub analog: Result<u16, SensorError>,
    pub analog_reads: usize,
    pub calls: Vec<ActuatorCall>,
}

#[allow(dead_code)]
impl MockHardware {
    /// Readings equal to the boot state, so nothing changes until a test
    /// says so.
    pub fn new() -> Self {
        Self {
            temperature: Ok(24.0),
            humidity: Ok(50.0),
            analog: Ok(0),
            analog_reads: 0,
            calls: Vec::new(),
        }
    }

    pub fn fan_on(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::Fan(on) => Some(*on),
                ActuatorCall::AllOff => Some(false),
                ActuatorCall::Level(_) => None,
            })
            .unwrap_or(false)
    }

    pub fn level(&self) -> Option<AirQualityLevel> {
        self.calls.iter().rev().find_map(|c| match c {
            ActuatorCall::Level(l) => Some(*l),
            _ => None,
        })
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHardware {
    fn read_temperature_c(&mut self) -> Result<f32, SensorError> {
        self.temperature
    }

    fn read_humidity_pct(&mut self) -> Result<f32, SensorError> {
        self.humidity
    }

    fn read_analog_raw(&mut self) -> Result<u16, SensorError> {
        self.analog_reads += 1;
        self.analog
    }
}

impl ActuatorPort for MockHardware {
    fn show_level(&mut self, level: AirQualityLevel) {
        self.calls.push(ActuatorCall::Level(level));
    }

    fn set_fan(&mut self, on: bool) {
        self.calls.push(ActuatorCall::Fan(on));
    }

    fn all_off(&mut self) {
        self.calls.push(ActuatorCall::AllOff);
    }
}

// ── MockTransport ─────────────────────────────────────────────

pub struct MockTransport {
    pub events: VecDeque<TransportEvent>,
    pub sent: Vec<String>,
    pub connected: bool,
    /// `is_connected` reports false for this many polls after `connect`.
    pub up_after_polls: u32,
    pub connects: u32,
    polls: Cell<u32>,
}

#[allow(dead_code)]
impl MockTransport {
    pub fn new() -> Self {
        Self {
            events: VecDeque::new(),
            sent: Vec::new(),
            connected: false,
            up_after_polls: 0,
            connects: 0,
            polls: Cell::new(0),
        }
    }

    /// Already connected, no pending events.
    pub fn online() -> Self {
        Self { connected: true, ..Self::new() }
    }

    pub fn push_text(&mut self, payload: &str) {
        self.events.push_back(TransportEvent::text(payload));
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl TextTransport for MockTransport {
    fn connect(&mut self, _host: &str, _port: u16, _path: &str) -> Result<(), TransportError> {
        self.connects += 1;
        self.connected = true;
        self.events.push_back(TransportEvent::Connected);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        let n = self.polls.get() + 1;
        self.polls.set(n);
        self.connected && n > self.up_after_polls
    }

    fn send_text(&mut self, payload: &str) -> Result<(), TransportError> {
        if !self.connected {
            return Err(TransportError::NotConnected);
        }
        self.sent.push(payload.to_owned());
        Ok(())
    }

    fn poll_event(&mut self) -> Option<TransportEvent> {
        self.events.pop_front()
    }
}

// ── MockDelay ─────────────────────────────────────────────────

#[derive(Default)]
pub struct MockDelay {
    pub total_ns: u64,
}

#[allow(dead_code)]
impl MockDelay {
    pub fn total_ms(&self) -> u64 {
        self.total_ns / 1_000_000
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
