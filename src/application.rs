//! Application layer: routes events through the game and out to the board

use embedded_hal::digital::v2::OutputPin;
use ufmt::uWrite;

use crate::config::GameConfig;
use crate::display::{Step, WriteSequencer};
use crate::drivers::{FlagLeds, LcdBus};
use crate::error::{Error, Result};
use crate::game::{GameContext, GameState, Scoreboard, Team};
use crate::logger::Trace;
use crate::os::Event;

pub struct Application<B, R, G, W> {
    game: GameContext,
    lcd: B,
    leds: FlagLeds<R, G>,
    display: WriteSequencer,
    trace: Option<Trace<W>>,
}

impl<B, R, G, W, PE> Application<B, R, G, W>
where
    B: LcdBus,
    R: OutputPin<Error = PE>,
    G: OutputPin<Error = PE>,
    W: uWrite,
{
    pub fn new(config: GameConfig, lcd: B, leds: FlagLeds<R, G>, trace: Option<Trace<W>>) -> Self {
        let mut app = Self {
            game: GameContext::new(config),
            lcd,
            leds,
            display: WriteSequencer::new(),
            trace,
        };
        app.log(|trace| trace.boot());
        app
    }

    /// Run one event to completion: game first, then at most one LCD write
    /// per tick, then the flag LEDs.
    pub fn handle(&mut self, event: Event) -> Result<()> {
        let before = self.game.state();
        let board = *self.game.scoreboard();
        let minutes = self.game.countdown().minutes();

        match event {
            Event::Edge(edge) => self.game.on_edge(edge),
            Event::Tick => self.game.on_tick(),
        }
        self.display.request(self.game.take_dirty());

        let lcd = match event {
            Event::Tick => self.step_display(),
            Event::Edge(_) => Ok(()),
        };
        let leds = self
            .leds
            .apply(self.game.indicators())
            .map_err(|_| Error::Indicator);

        self.report(before, board, minutes);
        lcd.and(leds)
    }

    fn step_display(&mut self) -> Result<()> {
        let game = &self.game;
        let step = self
            .display
            .step(&mut self.lcd, |field| game.field_value(field))
            .map_err(|_| Error::Display)?;
        if step == Step::ScriptDone {
            self.game.finish_startup();
            self.display.request(self.game.take_dirty());
        }
        Ok(())
    }

    fn report(&mut self, before: GameState, board: Scoreboard, minutes: u8) {
        if self.trace.is_none() {
            return;
        }
        let after = self.game.state();
        let now = *self.game.scoreboard();
        for team in Team::BOTH {
            if now.score(team) > board.score(team) {
                self.log(|trace| trace.scored(team, &now));
            }
        }
        if after == GameState::Init && self.game.countdown().minutes() != minutes {
            let minutes = self.game.countdown().minutes();
            self.log(|trace| trace.minutes(minutes));
        }
        if after != before {
            self.log(|trace| trace.transition(before, after));
            if let (GameState::GameOver, Some(winner)) = (after, self.game.winner()) {
                self.log(|trace| trace.winner(winner, &now));
            }
        }
    }

    /// Record events the interrupt handlers could not queue.
    pub fn note_dropped(&mut self, count: u16) {
        if count > 0 {
            self.log(|trace| trace.dropped(count));
        }
    }

    // The trace is dropped after its first failed write.
    fn log<F>(&mut self, write: F)
    where
        F: FnOnce(&mut Trace<W>) -> core::result::Result<(), W::Error>,
    {
        if let Some(trace) = self.trace.as_mut() {
            if write(trace).is_err() {
                self.trace = None;
            }
        }
    }

    pub fn game(&self) -> &GameContext {
        &self.game
    }

    pub fn display(&self) -> &WriteSequencer {
        &self.display
    }

    pub fn lcd(&self) -> &B {
        &self.lcd
    }

    pub fn leds(&self) -> &FlagLeds<R, G> {
        &self.leds
    }

    pub fn trace(&self) -> Option<&Trace<W>> {
        self.trace.as_ref()
    }

    pub fn release(self) -> (B, FlagLeds<R, G>, Option<Trace<W>>) {
        (self.lcd, self.leds, self.trace)
    }
}
