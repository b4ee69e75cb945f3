use avr_device::atmega128a::{PORTA, PORTC, PORTD};
use core::convert::Infallible;
use core::marker::PhantomData;
use embedded_hal::digital::v2::OutputPin;

pub trait PinMode {}
pub struct Input;
pub struct Output;
impl PinMode for Input {}
impl PinMode for Output {}

#[derive(Debug)]
pub struct Pin<PORT, const PIN: u8, MODE> {
    _port: PhantomData<PORT>,
    _mode: PhantomData<MODE>,
}

impl<PORT, const P: u8, MODE: PinMode> Pin<PORT, P, MODE> {
    // Only `board::take` hands pins out, once.
    const fn new() -> Self {
        Pin {
            _port: PhantomData,
            _mode: PhantomData,
        }
    }
}

macro_rules! impl_port {
    ($PORT:ident, $port:ident, $ddr:ident) => {
        impl<const P: u8, MODE: PinMode> Pin<$PORT, P, MODE> {
            pub fn into_output(self) -> Pin<$PORT, P, Output> {
                // Set DDRx bit
                unsafe {
                    (*$PORT::ptr()).$ddr.modify(|r, w| w.bits(r.bits() | (1 << P)));
                }
                Pin::new()
            }

            /// Input with the internal pull-up enabled, for active low switches.
            pub fn into_pull_up_input(self) -> Pin<$PORT, P, Input> {
                unsafe {
                    (*$PORT::ptr()).$ddr.modify(|r, w| w.bits(r.bits() & !(1 << P)));
                    (*$PORT::ptr()).$port.modify(|r, w| w.bits(r.bits() | (1 << P)));
                }
                Pin::new()
            }
        }

        impl<const P: u8> OutputPin for Pin<$PORT, P, Output> {
            type Error = Infallible;

            #[inline]
            fn set_high(&mut self) -> Result<(), Infallible> {
                avr_device::interrupt::free(|_| unsafe {
                    (*$PORT::ptr()).$port.modify(|r, w| w.bits(r.bits() | (1 << P)));
                });
                Ok(())
            }

            #[inline]
            fn set_low(&mut self) -> Result<(), Infallible> {
                avr_device::interrupt::free(|_| unsafe {
                    (*$PORT::ptr()).$port.modify(|r, w| w.bits(r.bits() & !(1 << P)));
                });
                Ok(())
            }
        }
    };
}

impl_port!(PORTA, porta, ddra);
impl_port!(PORTC, portc, ddrc);
impl_port!(PORTD, portd, ddrd);

// Scoreboard wiring
pub mod board {
    use super::*;

    // Flag LEDs (PORTA)
    pub type RedLed = Pin<PORTA, 0, Output>;
    pub type GreenLed = Pin<PORTA, 1, Output>;

    // LCD 4-bit bus (PORTC)
    pub type LcdD4 = Pin<PORTC, 0, Output>;
    pub type LcdD5 = Pin<PORTC, 1, Output>;
    pub type LcdD6 = Pin<PORTC, 2, Output>;
    pub type LcdD7 = Pin<PORTC, 3, Output>;
    pub type LcdRs = Pin<PORTC, 4, Output>;
    pub type LcdRw = Pin<PORTC, 5, Output>;
    pub type LcdEn = Pin<PORTC, 6, Output>;

    // Sensors and controls on INT0..INT3 (PORTD), active low
    pub type RedTake = Pin<PORTD, 0, Input>;
    pub type GreenTake = Pin<PORTD, 1, Input>;
    pub type Enter = Pin<PORTD, 2, Input>;
    pub type Up = Pin<PORTD, 3, Input>;

    pub struct Pins {
        pub red_led: RedLed,
        pub green_led: GreenLed,
        pub lcd_d4: LcdD4,
        pub lcd_d5: LcdD5,
        pub lcd_d6: LcdD6,
        pub lcd_d7: LcdD7,
        pub lcd_rs: LcdRs,
        pub lcd_rw: LcdRw,
        pub lcd_en: LcdEn,
        pub red_take: RedTake,
        pub green_take: GreenTake,
        pub enter: Enter,
        pub up: Up,
    }

    /// Configure every board pin. Consumes the port peripherals so this
    /// runs once.
    pub fn take(_a: PORTA, _c: PORTC, _d: PORTD) -> Pins {
        Pins {
            red_led: Pin::<PORTA, 0, Input>::new().into_output(),
            green_led: Pin::<PORTA, 1, Input>::new().into_output(),
            lcd_d4: Pin::<PORTC, 0, Input>::new().into_output(),
            lcd_d5: Pin::<PORTC, 1, Input>::new().into_output(),
            lcd_d6: Pin::<PORTC, 2, Input>::new().into_output(),
            lcd_d7: Pin::<PORTC, 3, Input>::new().into_output(),
            lcd_rs: Pin::<PORTC, 4, Input>::new().into_output(),
            lcd_rw: Pin::<PORTC, 5, Input>::new().into_output(),
            lcd_en: Pin::<PORTC, 6, Input>::new().into_output(),
            red_take: Pin::<PORTD, 0, Input>::new().into_pull_up_input(),
            green_take: Pin::<PORTD, 1, Input>::new().into_pull_up_input(),
            enter: Pin::<PORTD, 2, Input>::new().into_pull_up_input(),
            up: Pin::<PORTD, 3, Input>::new().into_pull_up_input(),
        }
    }
}
