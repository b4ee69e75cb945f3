pub mod exint;
pub mod gpio;
pub mod power;
pub mod timer;
pub mod uart;
pub mod watchdog;

// Re-export commonly used types
pub use exint::ExtInt;
pub use gpio::{board, Input, Output, Pin};
pub use power::{Power, SleepMode};
pub use timer::{Prescaler, TickTimer};
pub use uart::Uart;
pub use watchdog::{Watchdog, WatchdogTimeout};
