#![allow(clippy::missing_safety_doc)]

use avr_device::atmega128a::USART0;
use avr_device::interrupt::Mutex;
use core::cell::RefCell;

use crate::config::{CPU_FREQ_HZ, UART_BAUD};

// Buffer size must be power of 2 for efficient masking
const BUFFER_SIZE: usize = 128;
const BUFFER_MASK: usize = BUFFER_SIZE - 1;

const UBRR: u16 = (CPU_FREQ_HZ / (16 * UART_BAUD) - 1) as u16;

// UCSR0B bits
const TXEN: u8 = 1 << 3;
const UDRIE: u8 = 1 << 5;
// UCSR0C: asynchronous, 8 data bits, 1 stop bit
const FRAME_8N1: u8 = 0x06;

pub struct Buffer {
    data: [u8; BUFFER_SIZE],
    write_idx: usize,
    read_idx: usize,
}

impl Buffer {
    const fn new() -> Self {
        Self {
            data: [0; BUFFER_SIZE],
            write_idx: 0,
            read_idx: 0,
        }
    }

    fn write(&mut self, byte: u8) -> bool {
        let next_write = (self.write_idx + 1) & BUFFER_MASK;
        if next_write != self.read_idx {
            self.data[self.write_idx] = byte;
            self.write_idx = next_write;
            true
        } else {
            false
        }
    }

    fn read(&mut self) -> Option<u8> {
        if self.read_idx != self.write_idx {
            let byte = self.data[self.read_idx];
            self.read_idx = (self.read_idx + 1) & BUFFER_MASK;
            Some(byte)
        } else {
            None
        }
    }
}

static TX_BUFFER: Mutex<RefCell<Buffer>> = Mutex::new(RefCell::new(Buffer::new()));

/// Transmit only USART0, drained by the data register empty interrupt.
pub struct Uart {
    _usart: USART0,
}

impl Uart {
    pub fn new(usart: USART0) -> Self {
        unsafe {
            usart.ubrr0h.write(|w| w.bits((UBRR >> 8) as u8));
            usart.ubrr0l.write(|w| w.bits(UBRR as u8));
            usart.ucsr0c.write(|w| w.bits(FRAME_8N1));
            usart.ucsr0b.write(|w| w.bits(TXEN));
        }
        Self { _usart: usart }
    }

    /// Queue one byte. A full buffer drops it and returns false.
    pub fn write_byte(&mut self, byte: u8) -> bool {
        avr_device::interrupt::free(|cs| {
            let queued = TX_BUFFER.borrow(cs).borrow_mut().write(byte);
            unsafe {
                (*USART0::ptr()).ucsr0b.modify(|r, w| w.bits(r.bits() | UDRIE));
            }
            queued
        })
    }

    pub fn write_str(&mut self, s: &str) {
        for byte in s.bytes() {
            if !self.write_byte(byte) {
                break;
            }
        }
    }
}

/// Body of the USART0 data register empty interrupt.
pub fn service_tx() {
    avr_device::interrupt::free(|cs| {
        let usart = unsafe { &*USART0::ptr() };
        if let Some(byte) = TX_BUFFER.borrow(cs).borrow_mut().read() {
            usart.udr0.write(|w| unsafe { w.bits(byte) });
        } else {
            // Buffer empty - disable TX interrupt
            usart.ucsr0b.modify(|r, w| unsafe { w.bits(r.bits() & !UDRIE) });
        }
    });
}
