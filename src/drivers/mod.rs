pub mod button_handler;
pub mod flag_leds;
pub mod lcd;
#[cfg(target_arch = "avr")]
pub mod serial_console;

pub use button_handler::{ButtonEvent, ButtonHandler, Control, EdgeBatch, ALL_LINES};
pub use flag_leds::FlagLeds;
pub use lcd::{Lcd, LcdBus, NibbleWrite, Register};
#[cfg(target_arch = "avr")]
pub use serial_console::SerialConsole;
