//! Air-purifier remote: main entry point.
//!
//! Hexagonal architecture with a single cooperative control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter   LogEventSink   WsTransport   MonotonicClock │
//! │  (Sensor+Actuator) (EventSink)    (TextTransport) (TimePort)   │
//! │  WifiAdapter       Lcd1602                                     │
//! │  (Connectivity)    (DisplayPort)                               │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │           PurifierService (pure logic)                 │    │
//! │  │  state store · codec · thresholds                      │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use embedded_hal::delay::DelayNs;
use esp_idf_hal::delay::{Ets, FreeRtos};
use esp_idf_hal::gpio::{AnyIOPin, PinDriver, Pull};
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::units::Hertz;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::EspWifi;
use log::{info, warn};

use purifier::adapters::display::show_banner;
use purifier::adapters::hardware::HardwareAdapter;
use purifier::adapters::log_sink::LogEventSink;
use purifier::adapters::time::MonotonicClock;
use purifier::adapters::websocket::WsTransport;
use purifier::adapters::wifi::{ConnectivityPort, WifiAdapter};
use purifier::app::ports::{ActuatorPort, TimePort};
use purifier::app::service::PurifierService;
use purifier::app::startup;
use purifier::config::{ClimateSensorModel, LinkConfig, SystemConfig};
use purifier::drivers::fan::FanRelay;
use purifier::drivers::hw_init::{self, Adc1Channel, GpioOutput};
use purifier::drivers::lcd::Lcd1602;
use purifier::drivers::status_led::StatusLeds;
use purifier::drivers::watchdog::Watchdog;
use purifier::events::TRANSPORT_EVENTS;
use purifier::pins;
use purifier::sensors::SensorHub;
use purifier::sensors::dht::{ClimateDriver, Dht11Driver, Dht22Driver, DhtSensor};
use purifier::sensors::dust::DustSensor;

/// Pause at the end of each loop pass so the idle task gets to run.
const LOOP_YIELD_MS: u32 = 10;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Purifier remote v{}              ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let config = SystemConfig::compiled();
    let link = LinkConfig::compiled();

    // ── 2. Peripherals ────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    hw_init::init_peripherals()?;
    let watchdog = Watchdog::for_config(&config);

    // SAFETY: the DHT GPIO is not claimed by any other driver.
    let mut dht_pin = PinDriver::input_output_od(unsafe { AnyIOPin::new(pins::DHT_GPIO) })?;
    dht_pin.set_pull(Pull::Up)?;
    dht_pin.set_high()?;
    let climate: Box<dyn ClimateDriver> = match config.climate_sensor {
        ClimateSensorModel::Dht11 => Box::new(Dht11Driver::new(dht_pin, Ets)),
        ClimateSensorModel::Dht22 => Box::new(Dht22Driver::new(dht_pin, Ets)),
    };

    let sensors = SensorHub::new(
        DhtSensor::new(climate, config.climate_sensor),
        DustSensor::new(
            GpioOutput(pins::DUST_DRIVE_GPIO),
            Adc1Channel(pins::DUST_ADC_CHANNEL),
            config.adc_full_scale,
        ),
        Ets,
        MonotonicClock::new(),
    );
    let mut hw = HardwareAdapter::new(sensors, StatusLeds::new(), FanRelay::new());
    hw.all_off();

    // ── 3. Display ────────────────────────────────────────────
    // SAFETY: SDA/SCL GPIOs are used by this bus only.
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        unsafe { AnyIOPin::new(pins::I2C_SDA_GPIO) },
        unsafe { AnyIOPin::new(pins::I2C_SCL_GPIO) },
        &I2cConfig::new().baudrate(Hertz(pins::I2C_BAUD_HZ)),
    )?;
    let mut lcd = Lcd1602::new(i2c, pins::LCD_I2C_ADDRESS, Ets);
    let display_ok = match show_banner(&mut lcd) {
        Ok(()) => true,
        Err(e) => {
            warn!("LCD unavailable: {}", e);
            false
        }
    };

    // ── 4. Network ────────────────────────────────────────────
    let mut delay = FreeRtos;
    let mut wifi = WifiAdapter::new();
    wifi.attach(EspWifi::new(peripherals.modem, sysloop, Some(nvs))?);

    if config.scan_on_boot {
        match wifi.scan() {
            Ok(found) => {
                info!("WiFi scan: {} networks", found.len());
                for ap in &found {
                    info!("  {} ({} dBm)", ap.ssid, ap.rssi);
                }
            }
            Err(e) => warn!("WiFi scan failed: {}", e),
        }
    }

    startup::join_network(&mut wifi, &link, &mut delay, config.connect_retry_ms, |n| {
        watchdog.feed();
        log::debug!("WiFi join: poll {}", n);
    })?;

    let mut socket = WsTransport::new(&TRANSPORT_EVENTS);
    startup::join_socket(&mut socket, &link, &mut delay, config.connect_retry_ms, |n| {
        watchdog.feed();
        log::debug!("Socket join: poll {}", n);
    })?;

    // ── 5. Control loop ───────────────────────────────────────
    let clock = MonotonicClock::new();
    let mut sink = LogEventSink::new();
    let mut service = PurifierService::new(&config, link.auth_tag);
    service.start(&mut sink);

    info!("System ready. Entering control loop.");

    loop {
        service.run_iteration(clock.uptime_ms(), &mut hw, &mut socket, &mut delay, &mut sink);

        if display_ok && config.display_live_values {
            if let Err(e) = service.refresh_display(&mut lcd) {
                warn!("LCD refresh failed: {}", e);
            }
        }

        wifi.poll();
        watchdog.feed();
        delay.delay_ms(LOOP_YIELD_MS);
    }
}
