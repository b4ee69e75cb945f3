//! HD44780 character LCD on a 4-bit bus
//!
//! Every byte goes out as two nibbles, high first. A nibble is latched on
//! the falling edge of E, so each write is: set RS, clear RW, raise E, drive
//! D4-D7, drop E. The controller needs time between writes, which is why
//! callers issue at most one nibble per tick.

use embedded_hal::digital::v2::OutputPin;

/// Clear display, cursor home
pub const CMD_CLEAR: u8 = 0x01;
/// Display on, cursor off, blink off
pub const CMD_DISPLAY_ON: u8 = 0x0C;
/// 4-bit bus, two lines, 5x8 font
pub const CMD_FUNCTION_SET_4BIT_2LINE: u8 = 0x28;
/// Function set nibble sent three times to resynchronise the bus
pub const NIBBLE_FUNCTION_SET_8BIT: u8 = 0x3;
/// Function set nibble switching the bus to 4 bits
pub const NIBBLE_FUNCTION_SET_4BIT: u8 = 0x2;
/// Set DDRAM address
pub const CMD_SET_DDRAM: u8 = 0x80;
const ROW2_OFFSET: u8 = 0x40;

/// Value of the RS line for a write.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Register {
    Command,
    Data,
}

/// One write the controller can take per tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct NibbleWrite {
    pub register: Register,
    pub nibble: u8,
}

impl NibbleWrite {
    pub const fn command(nibble: u8) -> Self {
        Self { register: Register::Command, nibble: nibble & 0x0F }
    }

    pub const fn data(nibble: u8) -> Self {
        Self { register: Register::Data, nibble: nibble & 0x0F }
    }

    /// High nibble of `byte` bound for `register`.
    pub const fn high(register: Register, byte: u8) -> Self {
        Self { register, nibble: byte >> 4 }
    }

    /// Low nibble of `byte` bound for `register`.
    pub const fn low(register: Register, byte: u8) -> Self {
        Self { register, nibble: byte & 0x0F }
    }
}

/// DDRAM address command for 1-based `row` (1 or 2) and `col` (1-16).
pub fn cursor_command(row: u8, col: u8) -> u8 {
    debug_assert!((1..=2).contains(&row) && (1..=16).contains(&col));
    let mut address = CMD_SET_DDRAM;
    if row == 2 {
        address += ROW2_OFFSET;
    }
    address + col.saturating_sub(1)
}

/// Anything that can push one nibble into the display controller.
pub trait LcdBus {
    type Error;

    fn write_nibble(&mut self, write: NibbleWrite) -> Result<(), Self::Error>;
}

/// Pin level driver for the bus.
pub struct Lcd<RS, RW, EN, D4, D5, D6, D7> {
    rs: RS,
    rw: RW,
    en: EN,
    d4: D4,
    d5: D5,
    d6: D6,
    d7: D7,
}

impl<RS, RW, EN, D4, D5, D6, D7, E> Lcd<RS, RW, EN, D4, D5, D6, D7>
where
    RS: OutputPin<Error = E>,
    RW: OutputPin<Error = E>,
    EN: OutputPin<Error = E>,
    D4: OutputPin<Error = E>,
    D5: OutputPin<Error = E>,
    D6: OutputPin<Error = E>,
    D7: OutputPin<Error = E>,
{
    /// Takes the pins and parks the bus: E high, RS/RW low, data low.
    pub fn new(rs: RS, rw: RW, en: EN, d4: D4, d5: D5, d6: D6, d7: D7) -> Result<Self, E> {
        let mut lcd = Lcd { rs, rw, en, d4, d5, d6, d7 };
        lcd.en.set_high()?;
        lcd.rw.set_low()?;
        lcd.rs.set_low()?;
        lcd.drive_data(0)?;
        Ok(lcd)
    }

    fn drive_data(&mut self, nibble: u8) -> Result<(), E> {
        set_level(&mut self.d4, nibble & 0x1 != 0)?;
        set_level(&mut self.d5, nibble & 0x2 != 0)?;
        set_level(&mut self.d6, nibble & 0x4 != 0)?;
        set_level(&mut self.d7, nibble & 0x8 != 0)
    }

    pub fn release(self) -> (RS, RW, EN, D4, D5, D6, D7) {
        (self.rs, self.rw, self.en, self.d4, self.d5, self.d6, self.d7)
    }
}

impl<RS, RW, EN, D4, D5, D6, D7, E> LcdBus for Lcd<RS, RW, EN, D4, D5, D6, D7>
where
    RS: OutputPin<Error = E>,
    RW: OutputPin<Error = E>,
    EN: OutputPin<Error = E>,
    D4: OutputPin<Error = E>,
    D5: OutputPin<Error = E>,
    D6: OutputPin<Error = E>,
    D7: OutputPin<Error = E>,
{
    type Error = E;

    fn write_nibble(&mut self, write: NibbleWrite) -> Result<(), E> {
        set_level(&mut self.rs, write.register == Register::Data)?;
        self.rw.set_low()?;
        self.en.set_high()?;
        self.drive_data(write.nibble)?;
        self.en.set_low()
    }
}

fn set_level<P: OutputPin>(pin: &mut P, high: bool) -> Result<(), P::Error> {
    if high {
        pin.set_high()
    } else {
        pin.set_low()
    }
}
