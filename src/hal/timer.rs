use avr_device::atmega128a::TC0;

use crate::config::TICK_COMPARE;

#[derive(Clone, Copy)]
#[repr(u8)]
pub enum Prescaler {
    Stop = 0,
    Direct = 1,
    Div8 = 2,
    Div32 = 3,
    Div64 = 4,
    Div128 = 5,
    Div256 = 6,
    Div1024 = 7,
}

// TCCR0 bits
const WGM01: u8 = 1 << 3;
const PRESCALER_MASK: u8 = 0x07;
// TIMSK bits
const OCIE0: u8 = 1 << 1;

/// Timer0 in clear-on-compare mode, raising TIMER0_COMP at a fixed rate.
pub struct TickTimer {
    tc0: TC0,
}

impl TickTimer {
    /// 16MHz / 256 / (TICK_COMPARE + 1) = 250 Hz.
    pub fn new(tc0: TC0) -> Self {
        unsafe {
            tc0.tccr0.write(|w| w.bits(0));
            tc0.tcnt0.write(|w| w.bits(0));
            tc0.ocr0.write(|w| w.bits(TICK_COMPARE));
            tc0.tccr0.write(|w| w.bits(WGM01));
        }
        Self { tc0 }
    }

    pub fn start(&mut self, prescaler: Prescaler) {
        unsafe {
            self.tc0.tcnt0.write(|w| w.bits(0));
            self.tc0.tccr0.modify(|r, w| {
                w.bits((r.bits() & !PRESCALER_MASK) | (prescaler as u8 & PRESCALER_MASK))
            });
            self.tc0.timsk.modify(|r, w| w.bits(r.bits() | OCIE0));
        }
    }
}
