//! The full control loop on host: sim socket, sim GPIO/ADC, real drivers.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

use super::mock_hw::{lock_sim_peripherals, MockDelay, RecordingSink};

use purifier::adapters::hardware::HardwareAdapter;
use purifier::adapters::log_sink::LogEventSink;
use purifier::adapters::time::MonotonicClock;
use purifier::adapters::websocket::WsTransport;
use purifier::app::events::AppEvent;
use purifier::app::ports::EventSink;
use purifier::app::service::PurifierService;
use purifier::app::startup::join_socket;
use purifier::app::state::SensorKind;
use purifier::config::{ClimateSensorModel, LinkConfig, SystemConfig};
use purifier::drivers::fan::FanRelay;
use purifier::drivers::hw_init::{sim_gpio_level, sim_set_adc_raw, Adc1Channel, GpioOutput};
use purifier::drivers::status_led::StatusLeds;
use purifier::events::EventQueue;
use purifier::pins;
use purifier::sensors::dht::{Dht22Driver, DhtSensor};
use purifier::sensors::dust::DustSensor;
use purifier::sensors::SensorHub;

/// A DHT line with nothing attached: the pull-up holds it high forever.
struct FloatingLine;

impl ErrorType for FloatingLine {
    type Error = Infallible;
}

impl OutputPin for FloatingLine {
    fn set_low(&mut self) -> Result<(), Infallible> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}

impl InputPin for FloatingLine {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(true)
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(false)
    }
}

/// Record events and also push them through the console logger.
#[derive(Default)]
struct TeeSink {
    record: RecordingSink,
    log: LogEventSink,
}

impl EventSink for TeeSink {
    fn emit(&mut self, event: &AppEvent) {
        self.log.emit(event);
        self.record.emit(event);
    }
}

fn link() -> LinkConfig {
    LinkConfig {
        wifi_ssid: "home",
        wifi_password: "",
        ws_host: "172.20.10.2",
        ws_port: 80,
        ws_path: "/ws",
        auth_tag: "auth:arduino",
    }
}

#[test]
fn loop_authenticates_reports_and_actuates() {
    static QUEUE: EventQueue = EventQueue::new();
    let _guard = lock_sim_peripherals();

    let config = SystemConfig::default();
    let link = link();
    let hub = SensorHub::new(
        DhtSensor::new(
            Dht22Driver::new(FloatingLine, MockDelay::default()),
            ClimateSensorModel::Dht22,
        ),
        DustSensor::new(
            GpioOutput(pins::DUST_DRIVE_GPIO),
            Adc1Channel(pins::DUST_ADC_CHANNEL),
            config.adc_full_scale,
        ),
        MockDelay::default(),
        MonotonicClock::new(),
    );
    let mut hw = HardwareAdapter::new(hub, StatusLeds::new(), FanRelay::new());
    let mut ws = WsTransport::new(&QUEUE);
    let mut delay = MockDelay::default();
    let mut sink = TeeSink::default();

    assert_eq!(join_socket(&mut ws, &link, &mut delay, 500, |_| {}), Ok(0));

    let mut svc = PurifierService::new(&config, link.auth_tag);
    svc.start(&mut sink);
    sim_set_adc_raw(218);

    // Pass 1: auth goes out, the DHT is unplugged, no dust sample yet.
    svc.run_iteration(0, &mut hw, &mut ws, &mut delay, &mut sink);
    assert_eq!(ws.sim_sent.len(), 1);
    assert_eq!(ws.sim_sent[0].as_str(), "auth:arduino");
    assert!(sim_gpio_level(pins::LED_GREEN_GPIO));
    assert!(!sim_gpio_level(pins::FAN_GPIO));
    assert_eq!(svc.sensor_faults(), SensorKind::Temperature.mask() | SensorKind::Humidity.mask());
    assert_eq!(
        sink.record.count(|e| matches!(e, AppEvent::SensorFault { .. })),
        2
    );

    // Pass 2: controller asks for the state; the dust sample comes in dirty.
    assert!(ws.sim_receive("request"));
    svc.run_iteration(1000, &mut hw, &mut ws, &mut delay, &mut sink);
    let sent: Vec<&str> = ws.sim_sent.iter().map(|f| f.as_str()).collect();
    assert_eq!(
        sent,
        vec![
            "auth:arduino",
            "from_arduino:temperature:24.00",
            "from_arduino:humidity:50.00",
            "from_arduino:air_quality:10",
            "from_arduino:is_fan_auto:true",
            "from_arduino:is_fan_on:false",
            "from_arduino:air_quality:80",
        ]
    );
    assert!(sim_gpio_level(pins::LED_RED_GPIO));
    assert!(!sim_gpio_level(pins::LED_GREEN_GPIO));
    assert!(sim_gpio_level(pins::FAN_GPIO), "auto mode runs the fan on dirty air");

    // Pass 3: manual override turns the fan off despite the reading.
    assert!(ws.sim_receive("auto_off"));
    assert!(ws.sim_receive("fan_off"));
    svc.run_iteration(1010, &mut hw, &mut ws, &mut delay, &mut sink);
    assert!(!sim_gpio_level(pins::FAN_GPIO));
    assert_eq!(ws.sim_sent.len(), 7, "fan commands are not acknowledged");

    // Pass 4: the socket drops; the loop pauses and keeps its state.
    ws.sim_drop();
    svc.run_iteration(1020, &mut hw, &mut ws, &mut delay, &mut sink);
    assert_eq!(delay.total_ms(), 5000);
    assert_eq!(svc.state().air_quality, 80);
    assert_eq!(sink.record.count(|e| *e == AppEvent::LinkDown), 1);

    sim_set_adc_raw(0);
}
