//! HD44780 16x2 character LCD behind a PCF8574 I²C backpack.
//!
//! The expander's eight outputs map onto the LCD like this:
//!
//! ```text
//!  P7 P6 P5 P4 | P3        | P2 | P1 | P0
//!  D7 D6 D5 D4 | backlight | EN | RW | RS
//! ```
//!
//! so the controller runs in 4-bit mode: each byte goes out as two
//! nibbles, each latched by an EN pulse. RW is always low (write only).

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::error::DisplayError;

pub const COLUMNS: usize = 16;
pub const ROWS: usize = 2;

const RS: u8 = 0x01;
const EN: u8 = 0x04;
const BACKLIGHT: u8 = 0x08;

const CMD_CLEAR: u8 = 0x01;
const CMD_ENTRY_LEFT: u8 = 0x06;
const CMD_DISPLAY_ON: u8 = 0x0C;
const CMD_FUNCTION_4BIT_2LINE: u8 = 0x28;
const CMD_SET_DDRAM: u8 = 0x80;

const ROW_OFFSETS: [u8; ROWS] = [0x00, 0x40];

pub struct Lcd1602<I, D> {
    i2c: I,
    address: u8,
    delay: D,
}

impl<I: I2c, D: DelayNs> Lcd1602<I, D> {
    pub fn new(i2c: I, address: u8, delay: D) -> Self {
        Self { i2c, address, delay }
    }

    /// Power-on reset into 4-bit, two-line mode, display on, cleared.
    pub fn init(&mut self) -> Result<(), DisplayError> {
        self.delay.delay_ms(50);
        self.expander_write(0)?;
        // Three 8-bit function sets force a known state whatever the
        // controller was doing, then switch to 4-bit.
        for wait_us in [4500, 4500, 150] {
            self.write_nibble(0x30, false)?;
            self.delay.delay_us(wait_us);
        }
        self.write_nibble(0x20, false)?;

        self.command(CMD_FUNCTION_4BIT_2LINE)?;
        self.command(CMD_DISPLAY_ON)?;
        self.clear()?;
        self.command(CMD_ENTRY_LEFT)
    }

    pub fn clear(&mut self) -> Result<(), DisplayError> {
        self.command(CMD_CLEAR)?;
        self.delay.delay_ms(2);
        Ok(())
    }

    /// Out-of-range positions clamp to the last column or row.
    pub fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), DisplayError> {
        let offset = ROW_OFFSETS[usize::from(row).min(ROWS - 1)];
        let col = col.min(COLUMNS as u8 - 1);
        self.command(CMD_SET_DDRAM | (offset + col))
    }

    /// Write at the cursor. Non-ASCII characters show as `?`.
    pub fn write_str(&mut self, text: &str) -> Result<(), DisplayError> {
        for ch in text.chars() {
            let b = if ch.is_ascii() { ch as u8 } else { b'?' };
            self.send(b, true)?;
        }
        Ok(())
    }

    /// Clear and write both rows, each cut to [`COLUMNS`].
    pub fn show_lines(&mut self, top: &str, bottom: &str) -> Result<(), DisplayError> {
        self.clear()?;
        for (row, text) in [top, bottom].into_iter().enumerate() {
            self.set_cursor(0, row as u8)?;
            let end = text
                .char_indices()
                .nth(COLUMNS)
                .map_or(text.len(), |(i, _)| i);
            self.write_str(&text[..end])?;
        }
        Ok(())
    }

    fn command(&mut self, cmd: u8) -> Result<(), DisplayError> {
        self.send(cmd, false)
    }

    fn send(&mut self, byte: u8, data: bool) -> Result<(), DisplayError> {
        self.write_nibble(byte & 0xF0, data)?;
        self.write_nibble(byte << 4, data)
    }

    fn write_nibble(&mut self, nibble: u8, data: bool) -> Result<(), DisplayError> {
        let bits = (nibble & 0xF0) | if data { RS } else { 0 };
        self.expander_write(bits | EN)?;
        self.delay.delay_us(1);
        self.expander_write(bits)?;
        self.delay.delay_us(50);
        Ok(())
    }

    /// The backlight stays on for the life of the device.
    fn expander_write(&mut self, bits: u8) -> Result<(), DisplayError> {
        self.i2c
            .write(self.address, &[bits | BACKLIGHT])
            .map_err(|_| DisplayError::Bus)
    }
}
