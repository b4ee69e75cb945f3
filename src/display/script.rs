//! LCD power-on sequence and screen template

use crate::config::LCD_SETTLE_TICKS;
use crate::drivers::lcd::{
    cursor_command, NibbleWrite, Register, CMD_CLEAR, CMD_DISPLAY_ON, CMD_FUNCTION_SET_4BIT_2LINE,
    NIBBLE_FUNCTION_SET_4BIT, NIBBLE_FUNCTION_SET_8BIT,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScriptOp {
    /// Ticks with no write at all
    Settle(u8),
    /// A lone command nibble, only valid before 4-bit mode is set
    Nibble(u8),
    Command(u8),
    Cursor(u8, u8),
    Text(&'static [u8]),
}

impl ScriptOp {
    /// Ticks this op occupies.
    const fn len(&self) -> u8 {
        match self {
            ScriptOp::Settle(ticks) => *ticks,
            ScriptOp::Nibble(_) => 1,
            ScriptOp::Command(_) | ScriptOp::Cursor(..) => 2,
            ScriptOp::Text(text) => text.len() as u8 * 2,
        }
    }

    fn write(&self, sub: u8) -> Option<NibbleWrite> {
        let (register, byte) = match *self {
            ScriptOp::Settle(_) => return None,
            ScriptOp::Nibble(nibble) => return Some(NibbleWrite::command(nibble)),
            ScriptOp::Command(byte) => (Register::Command, byte),
            ScriptOp::Cursor(row, col) => (Register::Command, cursor_command(row, col)),
            ScriptOp::Text(text) => (Register::Data, text[(sub / 2) as usize]),
        };
        Some(if sub % 2 == 0 {
            NibbleWrite::high(register, byte)
        } else {
            NibbleWrite::low(register, byte)
        })
    }
}

/// Bus resync, 4-bit mode, clear, display on, two lines, then the template.
pub const POWER_ON: &[ScriptOp] = &[
    ScriptOp::Settle(LCD_SETTLE_TICKS),
    ScriptOp::Nibble(NIBBLE_FUNCTION_SET_8BIT),
    ScriptOp::Nibble(NIBBLE_FUNCTION_SET_8BIT),
    ScriptOp::Nibble(NIBBLE_FUNCTION_SET_8BIT),
    ScriptOp::Nibble(NIBBLE_FUNCTION_SET_4BIT),
    ScriptOp::Command(CMD_CLEAR),
    ScriptOp::Command(CMD_DISPLAY_ON),
    ScriptOp::Command(CMD_FUNCTION_SET_4BIT_2LINE),
    ScriptOp::Cursor(1, 1),
    ScriptOp::Text(b"G 00 T02:00 R 00"),
    ScriptOp::Cursor(2, 3),
    ScriptOp::Text(b"0"),
    ScriptOp::Cursor(2, 7),
    ScriptOp::Text(b"F0:00"),
    ScriptOp::Cursor(2, 15),
    ScriptOp::Text(b"0"),
];

/// Position inside [`POWER_ON`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ScriptCursor {
    op: u8,
    sub: u8,
}

impl ScriptCursor {
    pub const fn new() -> Self {
        Self { op: 0, sub: 0 }
    }

    /// Write for the current tick, `None` while settling.
    pub fn write(&self) -> Option<NibbleWrite> {
        POWER_ON.get(self.op as usize).and_then(|op| op.write(self.sub))
    }

    /// Move to the next tick. Returns false once the script is exhausted.
    pub fn advance(&mut self) -> bool {
        let Some(op) = POWER_ON.get(self.op as usize) else {
            return false;
        };
        self.sub += 1;
        if self.sub >= op.len() {
            self.sub = 0;
            self.op += 1;
        }
        (self.op as usize) < POWER_ON.len()
    }
}

/// Ticks the whole power-on script takes.
pub fn script_ticks() -> usize {
    POWER_ON.iter().map(|op| op.len() as usize).sum()
}
