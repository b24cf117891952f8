//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (UART / USB-CDC in production). Lines are
//! `TAG | detail` so they grep well on a serial console.

use log::{debug, error, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::app::state::SensorSample;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(state) => match serde_json::to_string(state) {
                Ok(json) => info!("START | state={}", json),
                Err(_) => info!("START | state={:?}", state),
            },
            AppEvent::LinkUp => info!("LINK | socket connected"),
            AppEvent::LinkDown => error!("LINK | socket disconnected"),
            AppEvent::Received(frame) => info!("RX | [Socket In] {}", frame),
            AppEvent::Sent(frame) => debug!("TX | {}", frame),
            AppEvent::SendFailed(e) => warn!("TX | dropped: {}", e),
            AppEvent::ReadingChanged(sample) => match sample {
                SensorSample::Temperature(v) => info!("READ | temperature={:.2}", v),
                SensorSample::Humidity(v) => info!("READ | humidity={:.2}", v),
                SensorSample::AirQuality(v) => info!("READ | air_quality={}", v),
            },
            AppEvent::SensorFault { kind, error } => {
                warn!("SENSOR | {:?} failing: {} (holding last value)", kind, error);
            }
            AppEvent::SensorRecovered(kind) => info!("SENSOR | {:?} recovered", kind),
            AppEvent::FanModeChanged { auto, on } => {
                info!("FAN | auto={} on={}", auto, on);
            }
        }
    }
}
