//! GPIO / peripheral pin assignments for the purifier remote board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers. The right-hand comments give the NodeMCU label
//! each signal was wired to on the first hardware revision.

// ---------------------------------------------------------------------------
// Dust sensor (GP2Y1010-style, pulsed IR LED + analog output)
// ---------------------------------------------------------------------------

/// Digital output: IR LED / heater drive, active LOW.          (D2)
pub const DUST_DRIVE_GPIO: i32 = 16;
/// Analog output of the sensor. ADC1 channel 6 (GPIO 34).       (A0)
pub const DUST_ADC_GPIO: i32 = 34;
/// ADC1 channel number for [`DUST_ADC_GPIO`].
pub const DUST_ADC_CHANNEL: u32 = 6;

// ---------------------------------------------------------------------------
// Climate sensor (DHT11 / DHT22 single-wire)
// ---------------------------------------------------------------------------

/// Open-drain data line with external pull-up.                  (D4)
pub const DHT_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// Actuators
// ---------------------------------------------------------------------------

/// Fan relay, active HIGH.                                      (D3)
pub const FAN_GPIO: i32 = 5;

/// Status LEDs, active HIGH.
pub const LED_RED_GPIO: i32 = 14; //                              (D5)
pub const LED_YELLOW_GPIO: i32 = 12; //                           (D6)
pub const LED_GREEN_GPIO: i32 = 13; //                            (D7)

// ---------------------------------------------------------------------------
// I²C bus (character LCD behind a PCF8574 backpack)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 21;
pub const I2C_SCL_GPIO: i32 = 22;
/// 7-bit address of the LCD backpack.
pub const LCD_I2C_ADDRESS: u8 = 0x27;
/// I²C bus clock.
pub const I2C_BAUD_HZ: u32 = 100_000;
