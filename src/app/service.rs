//! Application service: the hexagonal core.
//!
//! [`PurifierService`] owns the device state and runs one control-loop
//! iteration at a time: service the socket, then sense and act. All I/O
//! flows through port traits injected at call sites, so the whole service
//! is testable with mock adapters.
//!
//! ```text
//!  TextTransport ◀─▶ ┌──────────────────────────┐ ──▶ EventSink
//!   SensorPort ────▶ │     PurifierService      │
//! ActuatorPort ◀──── │ state · codec · control  │ ──▶ DisplayPort
//!                    └──────────────────────────┘
//! ```

use core::fmt::Write;

use embedded_hal::delay::DelayNs;
use log::info;

use crate::config::SystemConfig;
use crate::control::thresholds::Thresholds;
use crate::error::{DisplayError, SensorError};
use crate::events::EVENT_QUEUE_CAP;
use crate::protocol::codec::{Command, Encoder, Outbound, OutboundFrame};
use crate::protocol::transport::{TextTransport, TransportEvent};
use crate::sensors::air_quality::AirQualityEstimator;

use super::events::AppEvent;
use super::ports::{ActuatorPort, DisplayPort, EventSink, SensorPort};
use super::state::{DeviceState, SensorKind, SensorSample, StateStore};

// ───────────────────────────────────────────────────────────────
// PurifierService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct PurifierService {
    store: StateStore,
    thresholds: Thresholds,
    estimator: AirQualityEstimator,
    encoder: Encoder,
    /// Sent on every `Connected` event.
    auth_tag: &'static str,
    aq_interval_ms: u64,
    disconnect_pause_ms: u32,
    /// Uptime of the last dust sample. Starts at 0, so the first sample
    /// happens one full interval after boot.
    last_aq_sample_ms: u64,
    /// One bit per [`SensorKind`] currently failing.
    sensor_faults: u8,
    iterations: u64,
    /// State last written to the display.
    shown: Option<DeviceState>,
}

impl PurifierService {
    pub fn new(config: &SystemConfig, auth_tag: &'static str) -> Self {
        Self::with_state(config, auth_tag, DeviceState::default())
    }

    /// Construct around an explicit starting state (tests, warm restarts).
    pub fn with_state(config: &SystemConfig, auth_tag: &'static str, state: DeviceState) -> Self {
        Self {
            store: StateStore::with_state(state, config.change_deadband),
            thresholds: Thresholds::from_config(config),
            estimator: AirQualityEstimator::from_config(config),
            encoder: Encoder::from_config(config),
            auth_tag,
            aq_interval_ms: u64::from(config.aq_sample_interval_ms),
            disconnect_pause_ms: config.disconnect_pause_ms,
            last_aq_sample_ms: 0,
            sensor_faults: 0,
            iterations: 0,
            shown: None,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    pub fn start(&mut self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Started(*self.store.state()));
        info!("PurifierService started");
    }

    // ── Per-iteration orchestration ───────────────────────────

    /// One control-loop pass: transport events first, then sensors and
    /// actuators.
    ///
    /// `hw` satisfies **both** [`SensorPort`] and [`ActuatorPort`] so the
    /// port boundary stays explicit without a double mutable borrow.
    pub fn run_iteration(
        &mut self,
        now_ms: u64,
        hw: &mut (impl SensorPort + ActuatorPort),
        link: &mut impl TextTransport,
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
    ) {
        self.iterations += 1;
        self.service_transport(link, delay, sink);
        self.sense_and_act(now_ms, hw, link, sink);
    }

    /// Handle pending transport events. At most one queue's worth per
    /// call, so a chatty controller cannot starve the sensors.
    ///
    /// A disconnect ends the pass after its pause: at most one pause per
    /// call keeps the pass inside the watchdog timeout. Whatever is still
    /// queued is handled next pass.
    pub fn service_transport(
        &mut self,
        link: &mut impl TextTransport,
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
    ) {
        for _ in 0..EVENT_QUEUE_CAP {
            let Some(event) = link.poll_event() else {
                break;
            };
            let paused = matches!(event, TransportEvent::Disconnected);
            self.handle_event(event, link, delay, sink);
            if paused {
                break;
            }
        }
    }

    pub fn handle_event(
        &mut self,
        event: TransportEvent,
        link: &mut impl TextTransport,
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
    ) {
        match event {
            TransportEvent::Connected => {
                sink.emit(&AppEvent::LinkUp);
                let tag = self.auth_tag;
                self.send(link, tag, sink);
            }
            TransportEvent::Disconnected => {
                sink.emit(&AppEvent::LinkDown);
                delay.delay_ms(self.disconnect_pause_ms);
            }
            TransportEvent::Text(frame) => {
                sink.emit(&AppEvent::Received(frame.clone()));
                if let Some(cmd) = Command::decode(&frame) {
                    self.handle_command(cmd, link, sink);
                }
            }
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Apply a controller command. Only `request` produces outbound
    /// traffic; fan commands take effect on the actuators next pass.
    pub fn handle_command(
        &mut self,
        cmd: Command,
        link: &mut impl TextTransport,
        sink: &mut impl EventSink,
    ) {
        match cmd {
            Command::Request => {
                for msg in Outbound::snapshot(self.store.state()) {
                    self.publish(link, &msg, false, sink);
                }
                return;
            }
            Command::AutoOn => self.store.set_fan_auto(true),
            Command::AutoOff => self.store.set_fan_auto(false),
            Command::FanOn => self.store.set_fan_on(true),
            Command::FanOff => self.store.set_fan_on(false),
        }
        let state = self.store.state();
        sink.emit(&AppEvent::FanModeChanged {
            auto: state.fan_auto,
            on: state.fan_on,
        });
    }

    // ── Sensing and actuation ─────────────────────────────────

    /// Poll the sensors, notify changes, then drive LEDs and fan.
    ///
    /// Temperature and humidity are read every pass; the dust sensor only
    /// once `aq_sample_interval_ms` has elapsed since its last sample.
    pub fn sense_and_act(
        &mut self,
        now_ms: u64,
        hw: &mut (impl SensorPort + ActuatorPort),
        link: &mut impl TextTransport,
        sink: &mut impl EventSink,
    ) {
        let t = hw.read_temperature_c().map(SensorSample::Temperature);
        self.apply_reading(SensorKind::Temperature, t, link, sink);

        let h = hw.read_humidity_pct().map(SensorSample::Humidity);
        self.apply_reading(SensorKind::Humidity, h, link, sink);

        if self.air_sample_due(now_ms) {
            self.last_aq_sample_ms = now_ms;
            let aq = hw
                .read_analog_raw()
                .map(|raw| SensorSample::AirQuality(self.estimator.estimate(raw)));
            self.apply_reading(SensorKind::AirQuality, aq, link, sink);
        }

        self.apply_actuators(hw);
    }

    /// Whether a dust sample is due at `now_ms`.
    pub fn air_sample_due(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.last_aq_sample_ms) >= self.aq_interval_ms
    }

    fn apply_reading(
        &mut self,
        kind: SensorKind,
        reading: Result<SensorSample, SensorError>,
        link: &mut impl TextTransport,
        sink: &mut impl EventSink,
    ) {
        match reading {
            Ok(sample) => {
                if self.sensor_faults & kind.mask() != 0 {
                    self.sensor_faults &= !kind.mask();
                    sink.emit(&AppEvent::SensorRecovered(kind));
                }
                if self.store.update_if_changed(sample) {
                    sink.emit(&AppEvent::ReadingChanged(sample));
                    self.publish(link, &Outbound::from(sample), true, sink);
                }
            }
            Err(error) => {
                if self.sensor_faults & kind.mask() == 0 {
                    self.sensor_faults |= kind.mask();
                    sink.emit(&AppEvent::SensorFault { kind, error });
                }
            }
        }
    }

    /// Translate the current state into LED and fan outputs.
    fn apply_actuators(&self, hw: &mut impl ActuatorPort) {
        let state = self.store.state();
        hw.show_level(self.thresholds.level(state.air_quality));
        hw.set_fan(self.thresholds.fan_output(state));
    }

    // ── Outbound ──────────────────────────────────────────────

    fn publish(
        &mut self,
        link: &mut impl TextTransport,
        msg: &Outbound,
        change: bool,
        sink: &mut impl EventSink,
    ) {
        let encoded = if change {
            self.encoder.encode_change(msg)
        } else {
            self.encoder.encode(msg)
        };
        match encoded {
            Ok(frame) => self.send(link, &frame, sink),
            Err(e) => log::error!("{} frame dropped: {}", msg.field(), e),
        }
    }

    fn send(&self, link: &mut impl TextTransport, payload: &str, sink: &mut impl EventSink) {
        match link.send_text(payload) {
            Ok(()) => {
                let mut frame = OutboundFrame::new();
                for ch in payload.chars() {
                    if frame.push(ch).is_err() {
                        log::warn!("sent {} bytes, event keeps {}", payload.len(), frame.len());
                        break;
                    }
                }
                sink.emit(&AppEvent::Sent(frame));
            }
            Err(e) => sink.emit(&AppEvent::SendFailed(e)),
        }
    }

    // ── Display ───────────────────────────────────────────────

    /// Mirror the live readings on the display when they changed since the
    /// last successful write.
    pub fn refresh_display(&mut self, display: &mut impl DisplayPort) -> Result<(), DisplayError> {
        let state = *self.store.state();
        if self.shown == Some(state) {
            return Ok(());
        }
        let (top, bottom) = display_lines(&state);
        display.show_lines(&top, &bottom)?;
        self.shown = Some(state);
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> &DeviceState {
        self.store.state()
    }

    /// Control-loop passes since startup.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Bitmask of sensors currently failing (see [`SensorKind::mask`]).
    pub fn sensor_faults(&self) -> u8 {
        self.sensor_faults
    }
}

/// `T:24.0C H:50.0%` / `AQ:10 Fan:AUTO`
fn display_lines(state: &DeviceState) -> (heapless::String<32>, heapless::String<32>) {
    let mut top = heapless::String::new();
    let mut bottom = heapless::String::new();
    let _ = write!(top, "T:{:.1}C H:{:.1}%", state.temperature, state.humidity);
    let fan = match (state.fan_auto, state.fan_on) {
        (true, _) => "AUTO",
        (false, true) => "ON",
        (false, false) => "OFF",
    };
    let _ = write!(bottom, "AQ:{} Fan:{}", state.air_quality, fan);
    (top, bottom)
}
