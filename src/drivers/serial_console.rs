use core::convert::Infallible;

use avr_device::atmega128a::USART0;
use ufmt::uWrite;

use crate::hal::Uart;

/// USART0 console carrying the game trace.
pub struct SerialConsole {
    uart: Uart,
}

impl SerialConsole {
    pub fn new(usart: USART0) -> Self {
        Self {
            uart: Uart::new(usart),
        }
    }
}

impl uWrite for SerialConsole {
    type Error = Infallible;

    fn write_str(&mut self, s: &str) -> Result<(), Infallible> {
        self.uart.write_str(s);
        Ok(())
    }
}
