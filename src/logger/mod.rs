//! Game trace over the serial console
//!
//! One line per state change or notable game event, e.g.
//! `[GAME] Idle -> RedAttempt`. The trace is optional and only ever written
//! from the main loop.

use ufmt::{uDisplay, uWrite, uwrite, Formatter};

use crate::game::{GameState, Scoreboard, Team, Winner};

impl uDisplay for GameState {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        f.write_str(self.name())
    }
}

impl uDisplay for Winner {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        f.write_str(match self {
            Winner::Red => "RED",
            Winner::Green => "GREEN",
            Winner::Tie => "TIE",
        })
    }
}

pub struct Trace<W> {
    out: W,
}

impl<W: uWrite> Trace<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn boot(&mut self) -> Result<(), W::Error> {
        uwrite!(&mut self.out, "[SYS] Seize & Secure v{}\r\n", env!("CARGO_PKG_VERSION"))
    }

    pub fn transition(&mut self, from: GameState, to: GameState) -> Result<(), W::Error> {
        uwrite!(&mut self.out, "[GAME] {} -> {}\r\n", from, to)
    }

    pub fn scored(&mut self, team: Team, board: &Scoreboard) -> Result<(), W::Error> {
        let who = match team {
            Team::Red => "RED",
            Team::Green => "GREEN",
        };
        uwrite!(
            &mut self.out,
            "[SCORE] {} G{} R{}\r\n",
            who,
            board.score(Team::Green),
            board.score(Team::Red)
        )
    }

    pub fn winner(&mut self, winner: Winner, board: &Scoreboard) -> Result<(), W::Error> {
        uwrite!(
            &mut self.out,
            "[GAME] winner {} G{} R{}\r\n",
            winner,
            board.score(Team::Green),
            board.score(Team::Red)
        )
    }

    pub fn minutes(&mut self, minutes: u8) -> Result<(), W::Error> {
        uwrite!(&mut self.out, "[SETUP] game length {} min\r\n", minutes)
    }

    pub fn dropped(&mut self, count: u16) -> Result<(), W::Error> {
        uwrite!(&mut self.out, "[WARN] {} events dropped\r\n", count)
    }

    pub fn release(self) -> W {
        self.out
    }
}
