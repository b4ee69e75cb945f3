//! Configuration constants for the Seize & Secure firmware

/// CPU frequency in Hz
pub const CPU_FREQ_HZ: u32 = 16_000_000;

/// Trace UART baud rate
pub const UART_BAUD: u32 = 9600;

/// Timer0 compare value for a 250Hz tick (16MHz / 256 / 250)
pub const TICK_COMPARE: u8 = 249;

/// Ticks per real second at the Timer0 rate above
pub const TICKS_PER_SECOND: u16 = 250;

/// Ticks the LCD needs after power-on before it accepts commands
pub const LCD_SETTLE_TICKS: u8 = 12;

/// Edge/tick events the main loop can lag behind before dropping
pub const EVENT_QUEUE_SIZE: usize = 16;

/// Game timing and rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameConfig {
    /// Tick events per game second
    pub ticks_per_second: u16,
    /// Whole seconds a sensor must be held; the transfer lands on the next one
    pub attempt_threshold_secs: u8,
    /// Continuous possession that wins the game outright
    pub possession_win_minutes: u8,
    /// Possession seconds per point
    pub score_interval_secs: u8,
    /// Length of the start signal flashing
    pub signal_start_secs: u8,
    pub min_game_minutes: u8,
    pub max_game_minutes: u8,
    pub default_game_minutes: u8,
}

impl GameConfig {
    pub const fn new() -> Self {
        Self {
            ticks_per_second: TICKS_PER_SECOND,
            attempt_threshold_secs: 5,
            possession_win_minutes: 2,
            score_interval_secs: 10,
            signal_start_secs: 6,
            min_game_minutes: 2,
            max_game_minutes: 20,
            default_game_minutes: 2,
        }
    }

    /// Same rules, `ticks` tick events per second.
    pub const fn with_ticks_per_second(mut self, ticks: u16) -> Self {
        self.ticks_per_second = ticks;
        self
    }

    /// Minutes selection after one `up` press in Init.
    pub fn next_game_minutes(&self, minutes: u8) -> u8 {
        if minutes >= self.max_game_minutes || minutes < self.min_game_minutes {
            self.min_game_minutes
        } else {
            minutes + 1
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
