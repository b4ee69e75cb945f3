use avr_device::atmega128a::EXINT;

use crate::drivers::ALL_LINES;

// EICRA ISCn1:ISCn0 values
const SENSE_FALLING: u8 = 0b10;
const SENSE_RISING: u8 = 0b11;

/// External interrupts INT0..INT3, one per sensor or control line.
pub struct ExtInt {
    exint: EXINT,
}

impl ExtInt {
    pub fn new(exint: EXINT) -> Self {
        Self { exint }
    }

    /// Line n listens for a falling edge when bit n of `falling` is set,
    /// a rising edge otherwise.
    pub fn set_sense(&mut self, falling: u8) {
        let mut eicra = 0u8;
        for line in 0..4 {
            let sense = if falling & (1 << line) != 0 {
                SENSE_FALLING
            } else {
                SENSE_RISING
            };
            eicra |= sense << (line * 2);
        }
        unsafe {
            self.exint.eicra.write(|w| w.bits(eicra));
        }
    }

    pub fn enable(&mut self) {
        unsafe {
            self.exint.eimsk.modify(|r, w| w.bits(r.bits() | ALL_LINES));
        }
    }

    /// Pending lines, one bit per line.
    pub fn pending(&self) -> u8 {
        self.exint.eifr.read().bits() & ALL_LINES
    }

    /// Acknowledge `lines`. Flags clear by writing ones.
    pub fn clear_pending(&mut self, lines: u8) {
        unsafe {
            self.exint.eifr.write(|w| w.bits(lines & ALL_LINES));
        }
    }
}
