//! Scoreboard rendering, spread across ticks
//!
//! The tick handler never waits on the LCD controller. Every update is split
//! into single nibble writes and exactly one is issued per tick.
//!
//! ```text
//! row 1: G 00 T02:00 R 00
//! row 2:   0   F0:00   0
//! ```

pub mod script;

use crate::drivers::lcd::{cursor_command, LcdBus, NibbleWrite, Register};
use crate::game::Team;
use script::ScriptCursor;

/// A value on screen that can go stale.
///
/// Declaration order is drain priority, highest first.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum DisplayField {
    GreenScore,
    RedScore,
    PossessionMinutes,
    PossessionSeconds,
    GreenAttempt,
    RedAttempt,
    CountdownMinutes,
    CountdownSeconds,
}

impl DisplayField {
    pub const ALL: [DisplayField; 8] = [
        DisplayField::GreenScore,
        DisplayField::RedScore,
        DisplayField::PossessionMinutes,
        DisplayField::PossessionSeconds,
        DisplayField::GreenAttempt,
        DisplayField::RedAttempt,
        DisplayField::CountdownMinutes,
        DisplayField::CountdownSeconds,
    ];

    pub const fn score(team: Team) -> Self {
        match team {
            Team::Red => DisplayField::RedScore,
            Team::Green => DisplayField::GreenScore,
        }
    }

    pub const fn attempt(team: Team) -> Self {
        match team {
            Team::Red => DisplayField::RedAttempt,
            Team::Green => DisplayField::GreenAttempt,
        }
    }

    /// Row and 1-based column of the leftmost digit.
    pub const fn position(self) -> (u8, u8) {
        match self {
            DisplayField::GreenScore => (1, 3),
            DisplayField::CountdownMinutes => (1, 7),
            DisplayField::CountdownSeconds => (1, 10),
            DisplayField::RedScore => (1, 15),
            DisplayField::GreenAttempt => (2, 3),
            DisplayField::PossessionMinutes => (2, 8),
            DisplayField::PossessionSeconds => (2, 10),
            DisplayField::RedAttempt => (2, 15),
        }
    }

    /// Number of digits drawn.
    pub const fn width(self) -> u8 {
        match self {
            DisplayField::GreenAttempt | DisplayField::RedAttempt | DisplayField::PossessionMinutes => 1,
            _ => 2,
        }
    }

    /// Writes needed to draw the field: address and character per digit.
    pub const fn steps(self) -> u8 {
        self.width() * 4
    }

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Set of stale fields.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PendingFields(u8);

impl PendingFields {
    pub const fn empty() -> Self {
        PendingFields(0)
    }

    pub const fn all() -> Self {
        PendingFields(0xFF)
    }

    pub fn insert(&mut self, field: DisplayField) {
        self.0 |= field.bit();
    }

    pub fn extend(&mut self, other: PendingFields) {
        self.0 |= other.0;
    }

    pub fn contains(&self, field: DisplayField) -> bool {
        self.0 & field.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Remove and return the highest priority stale field.
    pub fn pop_highest(&mut self) -> Option<DisplayField> {
        if self.0 == 0 {
            return None;
        }
        let field = DisplayField::ALL[self.0.trailing_zeros() as usize];
        self.0 &= !field.bit();
        Some(field)
    }

    /// Take everything, leaving the set empty.
    pub fn take(&mut self) -> PendingFields {
        core::mem::take(self)
    }
}

/// Result of one sequencer tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// One nibble went out
    Wrote,
    /// Power-on delay, nothing written
    Waited,
    /// Nothing stale
    Idle,
    /// The last power-on write went out; the screen template is up
    ScriptDone,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct FieldCursor {
    field: DisplayField,
    value: u8,
    step: u8,
}

impl FieldCursor {
    fn write(&self) -> NibbleWrite {
        let (row, col) = self.field.position();
        let digit_index = self.step / 4;
        let digit = if self.field.width() == 2 && digit_index == 0 {
            self.value / 10
        } else {
            self.value % 10
        };
        let address = cursor_command(row, col + digit_index);
        let character = b'0' + digit;
        match self.step % 4 {
            0 => NibbleWrite::high(Register::Command, address),
            1 => NibbleWrite::low(Register::Command, address),
            2 => NibbleWrite::high(Register::Data, character),
            _ => NibbleWrite::low(Register::Data, character),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Mode {
    Script(ScriptCursor),
    Field(FieldCursor),
    Idle,
}

pub struct WriteSequencer {
    mode: Mode,
    queued: PendingFields,
}

impl WriteSequencer {
    /// A fresh sequencer runs the power-on script first.
    pub const fn new() -> Self {
        Self {
            mode: Mode::Script(ScriptCursor::new()),
            queued: PendingFields::empty(),
        }
    }

    /// Queue stale fields. A field being drawn is never interrupted; if it
    /// is requested again it is redrawn once it finishes.
    pub fn request(&mut self, fields: PendingFields) {
        self.queued.extend(fields);
    }

    /// Field currently being drawn.
    pub fn active(&self) -> Option<DisplayField> {
        match self.mode {
            Mode::Field(cursor) => Some(cursor.field),
            _ => None,
        }
    }

    pub fn queued(&self) -> PendingFields {
        self.queued
    }

    pub fn in_script(&self) -> bool {
        matches!(self.mode, Mode::Script(_))
    }

    pub fn is_idle(&self) -> bool {
        self.mode == Mode::Idle && self.queued.is_empty()
    }

    /// Issue at most one write. `value_of` supplies the number shown for a
    /// field, read once when that field starts drawing.
    pub fn step<B, F>(&mut self, bus: &mut B, value_of: F) -> Result<Step, B::Error>
    where
        B: LcdBus,
        F: Fn(DisplayField) -> u8,
    {
        if self.mode == Mode::Idle {
            match self.queued.pop_highest() {
                Some(field) => {
                    let value = value_of(field);
                    debug_assert!(value < 10u8.pow(field.width() as u32), "value too wide for field");
                    self.mode = Mode::Field(FieldCursor { field, value, step: 0 });
                }
                None => return Ok(Step::Idle),
            }
        }

        match self.mode {
            Mode::Script(mut cursor) => {
                let outcome = match cursor.write() {
                    Some(write) => {
                        bus.write_nibble(write)?;
                        Step::Wrote
                    }
                    None => Step::Waited,
                };
                if cursor.advance() {
                    self.mode = Mode::Script(cursor);
                    Ok(outcome)
                } else {
                    self.mode = Mode::Idle;
                    Ok(Step::ScriptDone)
                }
            }
            Mode::Field(mut cursor) => {
                bus.write_nibble(cursor.write())?;
                cursor.step += 1;
                self.mode = if cursor.step >= cursor.field.steps() {
                    Mode::Idle
                } else {
                    Mode::Field(cursor)
                };
                Ok(Step::Wrote)
            }
            Mode::Idle => Ok(Step::Idle),
        }
    }
}

impl Default for WriteSequencer {
    fn default() -> Self {
        Self::new()
    }
}
