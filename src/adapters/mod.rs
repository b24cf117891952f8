//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements         | Connects to                 |
//! |-------------|--------------------|-----------------------------|
//! | `display`   | DisplayPort        | HD44780 LCD over PCF8574    |
//! | `hardware`  | SensorPort         | DHT, dust sensor (GPIO/ADC) |
//! |             | ActuatorPort       | LED and fan GPIOs           |
//! | `log_sink`  | EventSink          | Serial log output           |
//! | `time`      | TimePort           | ESP32 system timer          |
//! | `websocket` | TextTransport      | esp_websocket_client        |
//! | `wifi`      | ConnectivityPort   | ESP-IDF WiFi STA            |

pub mod display;
pub mod hardware;
pub mod log_sink;
pub mod time;
pub mod websocket;
pub mod wifi;
