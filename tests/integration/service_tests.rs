//! PurifierService against mock hardware and transport: command handling,
//! change notifications, sensor faults, rate limiting and actuation.

use super::mock_hw::{ActuatorCall, MockDelay, MockHardware, MockTransport, RecordingSink};

use purifier::app::events::AppEvent;
use purifier::app::service::PurifierService;
use purifier::app::state::{DeviceState, SensorKind, SensorSample};
use purifier::config::SystemConfig;
use purifier::control::thresholds::AirQualityLevel;
use purifier::drivers::watchdog::effective_timeout_ms;
use purifier::error::{SensorError, TransportError};
use purifier::events::EVENT_QUEUE_CAP;
use purifier::protocol::codec::MAX_OUTBOUND_LEN;
use purifier::protocol::transport::TransportEvent;

const AUTH: &str = "auth:arduino";

struct Rig {
    svc: PurifierService,
    hw: MockHardware,
    link: MockTransport,
    delay: MockDelay,
    sink: RecordingSink,
}

impl Rig {
    fn new() -> Self {
        Self::with(SystemConfig::default(), DeviceState::default())
    }

    fn with(config: SystemConfig, state: DeviceState) -> Self {
        let mut sink = RecordingSink::new();
        let mut svc = PurifierService::with_state(&config, AUTH, state);
        svc.start(&mut sink);
        Self {
            svc,
            hw: MockHardware::new(),
            link: MockTransport::online(),
            delay: MockDelay::default(),
            sink,
        }
    }

    fn transport(&mut self) {
        self.svc
            .service_transport(&mut self.link, &mut self.delay, &mut self.sink);
    }

    fn sense(&mut self, now_ms: u64) {
        self.svc
            .sense_and_act(now_ms, &mut self.hw, &mut self.link, &mut self.sink);
    }

    fn iterate(&mut self, now_ms: u64) {
        self.svc.run_iteration(
            now_ms,
            &mut self.hw,
            &mut self.link,
            &mut self.delay,
            &mut self.sink,
        );
    }
}

// ── Requests ──────────────────────────────────────────────────

#[test]
fn request_reports_full_state_in_order() {
    let state = DeviceState {
        temperature: 22.5,
        humidity: 40.0,
        air_quality: 30,
        fan_auto: true,
        fan_on: false,
    };
    let mut rig = Rig::with(SystemConfig::default(), state);
    rig.link.push_text("request");
    rig.transport();

    assert_eq!(
        rig.link.sent,
        vec![
            "from_arduino:temperature:22.50",
            "from_arduino:humidity:40.00",
            "from_arduino:air_quality:30",
            "from_arduino:is_fan_auto:true",
            "from_arduino:is_fan_on:false",
        ]
    );
    assert_eq!(*rig.svc.state(), state, "request must not mutate state");
}

#[test]
fn request_reply_ignores_legacy_tag() {
    let config = SystemConfig { legacy_temperature_tag: true, ..SystemConfig::default() };
    let mut rig = Rig::with(config, DeviceState::default());
    rig.link.push_text("request");
    rig.transport();
    assert_eq!(rig.link.sent[0], "from_arduino:temperature:24.00");
}

#[test]
fn unknown_and_near_miss_commands_are_ignored() {
    let mut rig = Rig::new();
    for noise in ["Request", "request ", " request", "fan_on\n", "", "auto_on:1", "hello"] {
        rig.link.push_text(noise);
    }
    rig.transport();
    assert!(rig.link.sent.is_empty());
    assert_eq!(*rig.svc.state(), DeviceState::default());
    // Every frame is still logged on receipt.
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::Received(_))), 7);
}

// ── Fan commands ──────────────────────────────────────────────

#[test]
fn fan_commands_change_state_without_reply() {
    let mut rig = Rig::new();
    rig.link.push_text("auto_off");
    rig.link.push_text("fan_on");
    rig.transport();

    assert!(rig.link.sent.is_empty());
    assert!(!rig.svc.state().fan_auto);
    assert!(rig.svc.state().fan_on);
    assert_eq!(
        rig.sink.events.last(),
        Some(&AppEvent::FanModeChanged { auto: false, on: true })
    );
}

#[test]
fn fan_commands_are_idempotent() {
    let mut rig = Rig::new();
    rig.link.push_text("fan_on");
    rig.link.push_text("fan_on");
    rig.transport();
    assert!(rig.svc.state().fan_on);
    rig.link.push_text("fan_off");
    rig.link.push_text("fan_off");
    rig.transport();
    assert!(!rig.svc.state().fan_on);
}

#[test]
fn manual_fan_takes_effect_in_the_same_iteration() {
    let mut rig = Rig::new();
    rig.link.push_text("auto_off");
    rig.link.push_text("fan_on");
    rig.iterate(0);
    assert!(rig.hw.fan_on());

    rig.link.push_text("fan_off");
    rig.iterate(10);
    assert!(!rig.hw.fan_on());
}

#[test]
fn fan_on_in_auto_mode_is_remembered_but_ignored() {
    let mut rig = Rig::new();
    rig.link.push_text("fan_on");
    rig.iterate(0);
    // air_quality 10 < 50, auto mode keeps the fan off
    assert!(!rig.hw.fan_on());

    rig.link.push_text("auto_off");
    rig.iterate(10);
    assert!(rig.hw.fan_on());
}

// ── Connection events ─────────────────────────────────────────

#[test]
fn auth_tag_sent_on_connect() {
    let mut rig = Rig::new();
    rig.link.events.push_back(TransportEvent::Connected);
    rig.transport();
    assert_eq!(rig.link.sent, vec![AUTH]);

    rig.transport();
    assert_eq!(rig.link.sent.len(), 1, "no second auth without a reconnect");
}

#[test]
fn disconnect_pauses_then_reconnect_reauthenticates() {
    let mut rig = Rig::new();
    rig.link.events.push_back(TransportEvent::Connected);
    rig.link.events.push_back(TransportEvent::Disconnected);
    rig.link.events.push_back(TransportEvent::Connected);
    rig.transport();

    assert_eq!(rig.link.sent, vec![AUTH]);
    assert_eq!(rig.delay.total_ms(), 5000);
    assert_eq!(rig.link.events.len(), 1, "the pass ends with the pause");

    rig.transport();
    assert_eq!(rig.link.sent, vec![AUTH, AUTH]);
    assert_eq!(rig.delay.total_ms(), 5000);
    assert_eq!(rig.sink.count(|e| *e == AppEvent::LinkDown), 1);
}

#[test]
fn disconnect_burst_pauses_once_per_pass() {
    let config = SystemConfig::default();
    let mut rig = Rig::with(config.clone(), DeviceState::default());
    for _ in 0..EVENT_QUEUE_CAP {
        rig.link.events.push_back(TransportEvent::Disconnected);
    }
    rig.iterate(0);

    assert_eq!(rig.delay.total_ms(), u64::from(config.disconnect_pause_ms));
    assert!(rig.delay.total_ms() < u64::from(effective_timeout_ms(&config)));
    assert!(!rig.hw.calls.is_empty(), "sensing still runs after the pause");
    assert_eq!(rig.link.events.len(), EVENT_QUEUE_CAP - 1);

    rig.iterate(10);
    assert_eq!(rig.delay.total_ms(), 2 * u64::from(config.disconnect_pause_ms));
}

#[test]
fn oversized_payload_is_reported_truncated() {
    const LONG_TAG: &str = concat!(
        "auth:",
        "0123456789012345678901234567890123456789",
        "0123456789012345678901234567890123456789",
        "0123456789012345678901234567890123456789",
    );
    let mut sink = RecordingSink::new();
    let mut svc = PurifierService::new(&SystemConfig::default(), LONG_TAG);
    let mut link = MockTransport::online();
    let mut delay = MockDelay::default();
    link.events.push_back(TransportEvent::Connected);
    svc.service_transport(&mut link, &mut delay, &mut sink);

    assert_eq!(link.sent, vec![LONG_TAG]);
    let recorded = sink.events.iter().find_map(|e| match e {
        AppEvent::Sent(frame) => Some(frame.clone()),
        _ => None,
    });
    let frame = recorded.unwrap();
    assert_eq!(frame.len(), MAX_OUTBOUND_LEN);
    assert!(LONG_TAG.starts_with(frame.as_str()));
}

#[test]
fn one_pass_handles_at_most_a_queue_of_events() {
    let mut rig = Rig::new();
    for _ in 0..10 {
        rig.link.push_text("noise");
    }
    rig.transport();
    assert_eq!(rig.link.events.len(), 2);
    rig.transport();
    assert!(rig.link.events.is_empty());
}

// ── Change notifications ──────────────────────────────────────

#[test]
fn temperature_change_notifies_once() {
    let mut rig = Rig::new();
    rig.hw.temperature = Ok(25.5);
    rig.sense(0);
    rig.sense(10);

    assert_eq!(rig.link.sent, vec!["from_arduino:temperature:25.50"]);
    assert_eq!(rig.svc.state().temperature, 25.5);
    assert_eq!(
        rig.sink.count(|e| *e == AppEvent::ReadingChanged(SensorSample::Temperature(25.5))),
        1
    );
}

#[test]
fn legacy_flag_sends_temperature_change_under_humidity_tag() {
    let config = SystemConfig { legacy_temperature_tag: true, ..SystemConfig::default() };
    let mut rig = Rig::with(config, DeviceState::default());
    rig.hw.temperature = Ok(25.5);
    rig.sense(0);
    assert_eq!(rig.link.sent, vec!["from_arduino:humidity:25.50"]);
}

#[test]
fn humidity_change_notifies() {
    let mut rig = Rig::new();
    rig.hw.humidity = Ok(61.0);
    rig.sense(0);
    assert_eq!(rig.link.sent, vec!["from_arduino:humidity:61.00"]);
}

#[test]
fn unchanged_readings_are_silent() {
    let mut rig = Rig::new();
    for t in [0, 10, 20] {
        rig.sense(t);
    }
    assert!(rig.link.sent.is_empty());
}

#[test]
fn nan_reading_never_commits() {
    let mut rig = Rig::new();
    rig.hw.humidity = Ok(f32::NAN);
    rig.sense(0);
    assert!(rig.link.sent.is_empty());
    assert_eq!(rig.svc.state().humidity, 50.0);
}

#[test]
fn failed_send_still_commits_state() {
    let mut rig = Rig::new();
    rig.link.connected = false;
    rig.hw.temperature = Ok(30.0);
    rig.sense(0);

    assert_eq!(rig.svc.state().temperature, 30.0);
    assert_eq!(
        rig.sink.count(|e| *e == AppEvent::SendFailed(TransportError::NotConnected)),
        1
    );

    // Back online: no retry of the lost notification.
    rig.link.connected = true;
    rig.sense(10);
    assert!(rig.link.sent.is_empty());
}

// ── Sensor faults ─────────────────────────────────────────────

#[test]
fn sensor_error_holds_last_value_and_reports_once() {
    let mut rig = Rig::new();
    rig.hw.temperature = Err(SensorError::Timeout);
    rig.sense(0);
    rig.sense(10);

    assert_eq!(rig.svc.state().temperature, 24.0);
    assert!(rig.link.sent.is_empty());
    assert_eq!(
        rig.sink.count(|e| matches!(
            e,
            AppEvent::SensorFault { kind: SensorKind::Temperature, error: SensorError::Timeout }
        )),
        1
    );
    assert_eq!(rig.svc.sensor_faults(), SensorKind::Temperature.mask());

    rig.hw.temperature = Ok(24.0);
    rig.sense(20);
    assert_eq!(rig.sink.count(|e| *e == AppEvent::SensorRecovered(SensorKind::Temperature)), 1);
    assert_eq!(rig.svc.sensor_faults(), 0);
    assert!(rig.link.sent.is_empty(), "recovery to the same value is not a change");
}

#[test]
fn dust_sensor_error_keeps_actuators_on_last_value() {
    let state = DeviceState { air_quality: 90, ..DeviceState::default() };
    let mut rig = Rig::with(SystemConfig::default(), state);
    rig.hw.analog = Err(SensorError::AdcReadFailed);
    rig.sense(1000);
    assert_eq!(rig.svc.state().air_quality, 90);
    assert_eq!(rig.hw.level(), Some(AirQualityLevel::Poor));
    assert!(rig.hw.fan_on());
}

// ── Air quality ───────────────────────────────────────────────

#[test]
fn dust_sensor_sampled_once_per_interval() {
    let mut rig = Rig::new();
    rig.sense(0);
    assert_eq!(rig.hw.analog_reads, 0, "first sample waits one interval");
    rig.sense(999);
    assert_eq!(rig.hw.analog_reads, 0);
    rig.sense(1000);
    assert_eq!(rig.hw.analog_reads, 1);
    rig.sense(1500);
    assert_eq!(rig.hw.analog_reads, 1);
    rig.sense(2000);
    assert_eq!(rig.hw.analog_reads, 2);
}

#[test]
fn air_quality_change_notifies_and_drives_outputs() {
    let mut rig = Rig::new();
    // 182 counts = 0.889 V, index 50
    rig.hw.analog = Ok(182);
    rig.sense(1000);

    assert_eq!(rig.svc.state().air_quality, 50);
    assert_eq!(rig.link.sent, vec!["from_arduino:air_quality:50"]);
    assert_eq!(rig.hw.level(), Some(AirQualityLevel::Moderate));
    assert!(rig.hw.fan_on(), "auto mode runs the fan at the threshold");

    // 181 counts, index 49
    rig.hw.analog = Ok(181);
    rig.sense(2000);
    assert_eq!(rig.svc.state().air_quality, 49);
    assert_eq!(rig.hw.level(), Some(AirQualityLevel::Good));
    assert!(!rig.hw.fan_on());
}

#[test]
fn led_bands_follow_air_quality() {
    let mut rig = Rig::new();
    for (raw, aq, level) in [
        (0, 0, AirQualityLevel::Good),
        (217, 79, AirQualityLevel::Moderate),
        (218, 80, AirQualityLevel::Poor),
    ] {
        rig.hw.analog = Ok(raw);
        rig.sense(1000 * (u64::from(raw) + 1));
        assert_eq!(rig.svc.state().air_quality, aq);
        assert_eq!(rig.hw.level(), Some(level));
    }
}

#[test]
fn every_pass_drives_leds_and_fan() {
    let mut rig = Rig::new();
    rig.sense(0);
    assert_eq!(
        rig.hw.calls,
        vec![ActuatorCall::Level(AirQualityLevel::Good), ActuatorCall::Fan(false)]
    );
}

// ── Lifecycle ─────────────────────────────────────────────────

#[test]
fn start_reports_boot_state_and_iterations_count() {
    let mut rig = Rig::new();
    assert_eq!(rig.sink.events[0], AppEvent::Started(DeviceState::default()));
    rig.iterate(0);
    rig.iterate(1);
    assert_eq!(rig.svc.iterations(), 2);
}
