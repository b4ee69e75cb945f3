use avr_device::atmega128a::WDT;

#[derive(Clone, Copy)]
#[repr(u8)]
pub enum WatchdogTimeout {
    Ms16 = 0,
    Ms32 = 1,
    Ms65 = 2,
    Ms130 = 3,
    Ms260 = 4,
    Ms520 = 5,
    Ms1000 = 6,
    Ms2100 = 7,
}

// WDTCR bits
const WDCE: u8 = 1 << 4;
const WDE: u8 = 1 << 3;

/// Reset supervisor for a wedged main loop.
pub struct Watchdog {
    wdt: WDT,
}

impl Watchdog {
    #[inline]
    pub fn new(wdt: WDT) -> Self {
        Self { wdt }
    }

    #[inline]
    pub fn start(&mut self, timeout: WatchdogTimeout) {
        avr_device::interrupt::free(|_| {
            avr_device::asm::wdr();
            unsafe {
                // Timed sequence: change enable, then the new setting
                self.wdt.wdtcr.write(|w| w.bits(WDCE | WDE));
                self.wdt.wdtcr.write(|w| w.bits(WDE | timeout as u8));
            }
        });
    }

    #[inline]
    pub fn feed(&mut self) {
        avr_device::asm::wdr();
    }
}
