//! Character-LCD adapter: [`DisplayPort`] over the HD44780 driver.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::app::ports::DisplayPort;
use crate::drivers::lcd::Lcd1602;
use crate::error::DisplayError;

/// Boot banner, one entry per row.
pub const BANNER: [&str; 2] = ["Remote Controlled", "Air Purifier"];

impl<I: I2c, D: DelayNs> DisplayPort for Lcd1602<I, D> {
    fn init(&mut self) -> Result<(), DisplayError> {
        Lcd1602::init(self)
    }

    fn show_lines(&mut self, top: &str, bottom: &str) -> Result<(), DisplayError> {
        Lcd1602::show_lines(self, top, bottom)
    }
}

/// Bring the display up and put the banner on it.
pub fn show_banner(display: &mut impl DisplayPort) -> Result<(), DisplayError> {
    display.init()?;
    display.show_lines(BANNER[0], BANNER[1])
}
