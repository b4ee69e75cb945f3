use avr_device::atmega128a::CPU;

// MCUCR bits
const SE: u8 = 1 << 5;
const SM_MASK: u8 = 0x1C;

#[derive(Clone, Copy)]
#[repr(u8)]
pub enum SleepMode {
    Idle = 0,
    AdcNoiseReduction = 1,
    PowerDown = 2,
    PowerSave = 3,
    Standby = 6,
    ExtendedStandby = 7,
}

impl SleepMode {
    // SM1:SM0 sit at bits 4:3, SM2 at bit 2
    const fn mcucr_bits(self) -> u8 {
        let sm = self as u8;
        ((sm & 0x3) << 3) | (sm & 0x4)
    }
}

pub struct Power {
    cpu: CPU,
}

impl Power {
    pub fn new(cpu: CPU) -> Self {
        Self { cpu }
    }

    #[inline]
    pub fn set_sleep_mode(&mut self, mode: SleepMode) {
        self.cpu
            .mcucr
            .modify(|r, w| unsafe { w.bits((r.bits() & !SM_MASK) | mode.mcucr_bits()) });
    }

    /// Sleep until the next interrupt. Timer0 keeps running in idle.
    pub fn enter_idle_mode(&mut self) {
        self.set_sleep_mode(SleepMode::Idle);
        self.cpu.mcucr.modify(|r, w| unsafe { w.bits(r.bits() | SE) });
        avr_device::asm::sleep();
        self.cpu.mcucr.modify(|r, w| unsafe { w.bits(r.bits() & !SE) });
    }
}
