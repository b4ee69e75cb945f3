//! Tick driven game clocks
//!
//! Each clock counts ticks into an accumulator and acts once per game
//! second. Resetting a clock zeroes its seconds and its accumulator
//! together, so a reset mid-second never carries a partial second over.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickAccumulator {
    ticks: u16,
}

impl TickAccumulator {
    /// Count one tick. Returns true when a whole second has elapsed.
    #[inline]
    pub fn advance(&mut self, ticks_per_second: u16) -> bool {
        self.ticks += 1;
        if self.ticks >= ticks_per_second {
            self.ticks = 0;
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn reset(&mut self) {
        self.ticks = 0;
    }
}

/// Counts elapsed seconds. Used for capture attempts and the start signal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SecondCounter {
    seconds: u8,
    acc: TickAccumulator,
}

/// Capture attempt timer.
pub type AttemptClock = SecondCounter;

impl SecondCounter {
    pub const fn new() -> Self {
        Self { seconds: 0, acc: TickAccumulator { ticks: 0 } }
    }

    /// Returns true on the tick that completes a second.
    pub fn tick(&mut self, ticks_per_second: u16) -> bool {
        if self.acc.advance(ticks_per_second) {
            self.seconds = self.seconds.saturating_add(1);
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn seconds(&self) -> u8 {
        self.seconds
    }
}

/// What a countdown tick changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Countdown {
    /// Stopped, or mid-second
    Quiet,
    Second,
    /// Seconds wrapped to 59 and a minute was borrowed
    Minute,
    /// Reached 0:00 and stopped
    Expired,
}

/// Remaining game time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CountdownClock {
    minutes: u8,
    seconds: u8,
    acc: TickAccumulator,
    running: bool,
}

impl CountdownClock {
    pub const fn new(minutes: u8) -> Self {
        Self {
            minutes,
            seconds: 0,
            acc: TickAccumulator { ticks: 0 },
            running: false,
        }
    }

    /// Stop and load `minutes`:00.
    pub fn set_minutes(&mut self, minutes: u8) {
        *self = Self::new(minutes);
    }

    pub fn start(&mut self) {
        self.acc.reset();
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn tick(&mut self, ticks_per_second: u16) -> Countdown {
        if !self.running || !self.acc.advance(ticks_per_second) {
            return Countdown::Quiet;
        }
        let change = if self.seconds == 0 {
            debug_assert!(self.minutes > 0, "countdown running at 0:00");
            self.seconds = 59;
            self.minutes = self.minutes.saturating_sub(1);
            Countdown::Minute
        } else {
            self.seconds -= 1;
            Countdown::Second
        };
        if self.minutes == 0 && self.seconds == 0 {
            self.running = false;
            Countdown::Expired
        } else {
            change
        }
    }

    pub fn minutes(&self) -> u8 {
        self.minutes
    }

    pub fn seconds(&self) -> u8 {
        self.seconds
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

/// What a possession tick changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PossessionTick {
    pub second: bool,
    pub minute: bool,
    pub scored: bool,
}

/// Time the current owner has held the flag, plus its scoring interval.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PossessionClock {
    minutes: u8,
    seconds: u8,
    interval: u8,
    acc: TickAccumulator,
}

impl PossessionClock {
    pub const fn new() -> Self {
        Self {
            minutes: 0,
            seconds: 0,
            interval: 0,
            acc: TickAccumulator { ticks: 0 },
        }
    }

    /// Zero time held and the partial scoring interval.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn tick(&mut self, ticks_per_second: u16, score_interval_secs: u8) -> PossessionTick {
        let mut change = PossessionTick::default();
        if !self.acc.advance(ticks_per_second) {
            return change;
        }
        change.second = true;
        self.seconds += 1;
        self.interval += 1;
        if self.interval >= score_interval_secs {
            self.interval = 0;
            change.scored = true;
        }
        if self.seconds >= 60 {
            self.seconds = 0;
            self.minutes = self.minutes.saturating_add(1);
            change.minute = true;
        }
        change
    }

    pub fn minutes(&self) -> u8 {
        self.minutes
    }

    pub fn seconds(&self) -> u8 {
        self.seconds
    }

    /// Seconds banked towards the next point.
    pub fn interval(&self) -> u8 {
        self.interval
    }
}
