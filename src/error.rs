/// Output failures surfaced to the main loop.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// An LCD bus pin refused a level
    Display,
    /// A flag LED pin refused a level
    Indicator,
}

pub type Result<T> = core::result::Result<T, Error>;
