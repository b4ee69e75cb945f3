//! Seize & Secure game state machine
//!
//! Two teams fight over one flag. Holding a team's target sensor for more
//! than five whole seconds seizes the flag; holding the flag scores a point
//! every ten seconds, and two unbroken minutes of possession wins outright.
//! Otherwise the higher score wins when the countdown runs out.
//!
//! [`GameContext`] owns every counter. Edge events and ticks are fed to it
//! one at a time by a single consumer, so no handler can observe another
//! half way through.

pub mod clock;
pub mod scoreboard;

use crate::config::GameConfig;
use crate::display::{DisplayField, PendingFields};
use crate::drivers::{ButtonEvent, Control};
use clock::{AttemptClock, Countdown, CountdownClock, PossessionClock, SecondCounter};
pub use scoreboard::Scoreboard;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Team {
    Red,
    Green,
}

impl Team {
    pub const BOTH: [Team; 2] = [Team::Red, Team::Green];

    pub const fn opponent(self) -> Team {
        match self {
            Team::Red => Team::Green,
            Team::Green => Team::Red,
        }
    }

    /// The target sensor this team shoots at.
    pub const fn sensor(self) -> Control {
        match self {
            Team::Red => Control::RedTake,
            Team::Green => Control::GreenTake,
        }
    }

    pub fn from_sensor(control: Control) -> Option<Team> {
        match control {
            Control::RedTake => Some(Team::Red),
            Control::GreenTake => Some(Team::Green),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Winner {
    Red,
    Green,
    Tie,
}

impl From<Team> for Winner {
    fn from(team: Team) -> Self {
        match team {
            Team::Red => Winner::Red,
            Team::Green => Winner::Green,
        }
    }
}

/// Wanted state of the two flag LEDs.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Indicators {
    pub red: bool,
    pub green: bool,
}

impl Indicators {
    pub fn is_on(&self, team: Team) -> bool {
        match team {
            Team::Red => self.red,
            Team::Green => self.green,
        }
    }

    pub fn set(&mut self, team: Team, on: bool) {
        match team {
            Team::Red => self.red = on,
            Team::Green => self.green = on,
        }
    }

    pub fn toggle(&mut self, team: Team) {
        let on = self.is_on(team);
        self.set(team, !on);
    }

    /// Only `team`'s flag lit.
    pub fn only(team: Team) -> Self {
        let mut ind = Indicators::default();
        ind.set(team, true);
        ind
    }

    pub fn for_winner(winner: Winner) -> Self {
        match winner {
            Winner::Red => Indicators::only(Team::Red),
            Winner::Green => Indicators::only(Team::Green),
            Winner::Tie => Indicators { red: true, green: true },
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameState {
    /// LCD power-on script running
    Startup,
    /// Choosing the game length
    Init,
    /// Flashing both flags before the clock starts
    SignalStart,
    /// Flag not owned
    Idle,
    RedAttempt,
    GreenAttempt,
    RedOwns,
    GreenOwns,
    GameOver,
    RedAttemptWhileGreenOwns,
    GreenAttemptWhileRedOwns,
}

impl GameState {
    pub const fn attempt(team: Team) -> Self {
        match team {
            Team::Red => GameState::RedAttempt,
            Team::Green => GameState::GreenAttempt,
        }
    }

    pub const fn owns(team: Team) -> Self {
        match team {
            Team::Red => GameState::RedOwns,
            Team::Green => GameState::GreenOwns,
        }
    }

    /// `challenger` trying to take the flag from its opponent.
    pub const fn contest(challenger: Team) -> Self {
        match challenger {
            Team::Red => GameState::RedAttemptWhileGreenOwns,
            Team::Green => GameState::GreenAttemptWhileRedOwns,
        }
    }

    /// Team currently holding the flag, including while it is contested.
    pub fn owner(self) -> Option<Team> {
        match self {
            GameState::RedOwns | GameState::GreenAttemptWhileRedOwns => Some(Team::Red),
            GameState::GreenOwns | GameState::RedAttemptWhileGreenOwns => Some(Team::Green),
            _ => None,
        }
    }

    /// Team whose capture attempt is running.
    pub fn attempting(self) -> Option<Team> {
        match self {
            GameState::RedAttempt | GameState::RedAttemptWhileGreenOwns => Some(Team::Red),
            GameState::GreenAttempt | GameState::GreenAttemptWhileRedOwns => Some(Team::Green),
            _ => None,
        }
    }

    /// The countdown runs in these states.
    pub fn in_play(self) -> bool {
        self == GameState::Idle || self.owner().is_some() || self.attempting().is_some()
    }

    pub const fn name(self) -> &'static str {
        match self {
            GameState::Startup => "Startup",
            GameState::Init => "Init",
            GameState::SignalStart => "SignalStart",
            GameState::Idle => "Idle",
            GameState::RedAttempt => "RedAttempt",
            GameState::GreenAttempt => "GreenAttempt",
            GameState::RedOwns => "RedOwns",
            GameState::GreenOwns => "GreenOwns",
            GameState::GameOver => "GameOver",
            GameState::RedAttemptWhileGreenOwns => "RedAttemptWhileGreenOwns",
            GameState::GreenAttemptWhileRedOwns => "GreenAttemptWhileRedOwns",
        }
    }
}

pub struct GameContext {
    config: GameConfig,
    state: GameState,
    previous: GameState,
    countdown: CountdownClock,
    possession: PossessionClock,
    attempt: AttemptClock,
    signal: SecondCounter,
    scoreboard: Scoreboard,
    winner: Option<Winner>,
    indicators: Indicators,
    dirty: PendingFields,
}

impl GameContext {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            state: GameState::Startup,
            previous: GameState::Startup,
            countdown: CountdownClock::new(config.default_game_minutes),
            possession: PossessionClock::new(),
            attempt: AttemptClock::new(),
            signal: SecondCounter::new(),
            scoreboard: Scoreboard::new(),
            winner: None,
            indicators: Indicators::default(),
            dirty: PendingFields::empty(),
        }
    }

    /// The screen template is up; redraw every value and wait for setup.
    pub fn finish_startup(&mut self) {
        debug_assert_eq!(self.state, GameState::Startup, "startup finished twice");
        if self.state == GameState::Startup {
            self.dirty = PendingFields::all();
            self.enter(GameState::Init);
        }
    }

    /// Handle one classified input edge.
    pub fn on_edge(&mut self, event: ButtonEvent) {
        match (self.state, event) {
            (GameState::Init, ButtonEvent::Pressed(Control::Up)) => {
                self.indicators = Indicators::default();
                let minutes = self.config.next_game_minutes(self.countdown.minutes());
                self.countdown.set_minutes(minutes);
                self.mark(DisplayField::CountdownMinutes);
            }
            (GameState::Init, ButtonEvent::Pressed(Control::Enter)) => {
                self.indicators = Indicators::default();
                self.signal.reset();
                self.enter(GameState::SignalStart);
            }
            (GameState::Idle, ButtonEvent::Pressed(control)) => {
                if let Some(team) = Team::from_sensor(control) {
                    self.indicators = Indicators::only(team);
                    self.begin_attempt(team);
                }
            }
            (GameState::RedOwns | GameState::GreenOwns, ButtonEvent::Pressed(control)) => {
                let owner = self.state.owner();
                if let (Some(owner), Some(team)) = (owner, Team::from_sensor(control)) {
                    if team != owner {
                        self.begin_attempt(team);
                    }
                }
            }
            (state, ButtonEvent::Released(control)) if state.attempting().is_some() => {
                if state.attempting().map(Team::sensor) == Some(control) {
                    self.abandon_attempt();
                }
            }
            (GameState::GameOver, ButtonEvent::Pressed(Control::Up)) => self.restart(),
            // Startup, SignalStart and everything else ignore inputs
            _ => {}
        }
    }

    /// Advance every clock by one tick.
    pub fn on_tick(&mut self) {
        let tps = self.config.ticks_per_second;
        let was_in_play = self.state.in_play();

        match self.state {
            GameState::SignalStart => {
                if self.signal.tick(tps) {
                    self.indicators.toggle(Team::Red);
                    self.indicators.toggle(Team::Green);
                }
                if self.signal.seconds() >= self.config.signal_start_secs {
                    self.signal.reset();
                    self.indicators = Indicators::default();
                    self.countdown.start();
                    self.enter(GameState::Idle);
                }
            }
            GameState::GameOver => {
                if let Some(winner) = self.winner {
                    self.indicators = Indicators::for_winner(winner);
                }
            }
            _ => {}
        }

        if let Some(owner) = self.state.owner() {
            self.tick_possession(owner);
        }
        if let Some(team) = self.state.attempting() {
            self.tick_attempt(team);
        }

        if !was_in_play {
            return;
        }
        match self.countdown.tick(tps) {
            Countdown::Quiet => {}
            Countdown::Second => self.mark(DisplayField::CountdownSeconds),
            Countdown::Minute => {
                self.mark(DisplayField::CountdownMinutes);
                self.mark(DisplayField::CountdownSeconds);
            }
            Countdown::Expired => {
                self.mark(DisplayField::CountdownMinutes);
                self.mark(DisplayField::CountdownSeconds);
                let leader = self.scoreboard.leader();
                self.game_over(leader);
            }
        }
    }

    fn tick_possession(&mut self, owner: Team) {
        let change = self.possession.tick(self.config.ticks_per_second, self.config.score_interval_secs);
        if change.second {
            self.indicators.set(owner, true);
            if self.state == GameState::owns(owner) {
                self.indicators.set(owner.opponent(), false);
            }
            self.mark(DisplayField::PossessionSeconds);
        }
        if change.scored {
            self.scoreboard.credit(owner);
            self.mark(DisplayField::score(owner));
        }
        if change.minute {
            self.mark(DisplayField::PossessionMinutes);
        }
        if self.possession.minutes() >= self.config.possession_win_minutes {
            self.game_over(owner.into());
        }
    }

    fn tick_attempt(&mut self, team: Team) {
        if self.attempt.tick(self.config.ticks_per_second) {
            self.indicators.toggle(team);
            self.mark(DisplayField::attempt(team));
        }
        if self.attempt.seconds() > self.config.attempt_threshold_secs {
            self.seize(team);
        }
    }

    fn begin_attempt(&mut self, team: Team) {
        self.previous = self.state;
        self.attempt.reset();
        self.mark(DisplayField::attempt(team));
        let next = match self.state.owner() {
            Some(_) => GameState::contest(team),
            None => GameState::attempt(team),
        };
        self.enter(next);
    }

    /// Sensor let go before the threshold.
    fn abandon_attempt(&mut self) {
        let Some(team) = self.state.attempting() else {
            debug_assert!(false, "abandon outside an attempt");
            return;
        };
        self.attempt.reset();
        self.indicators.set(team, false);
        if let Some(owner) = self.state.owner() {
            self.indicators.set(owner, true);
        }
        self.mark(DisplayField::attempt(team));
        let back = self.previous;
        self.enter(back);
    }

    fn seize(&mut self, team: Team) {
        self.attempt.reset();
        self.possession.reset();
        self.indicators = Indicators::only(team);
        self.mark(DisplayField::attempt(team));
        self.mark(DisplayField::PossessionMinutes);
        self.mark(DisplayField::PossessionSeconds);
        self.previous = GameState::owns(team);
        self.enter(GameState::owns(team));
    }

    fn game_over(&mut self, winner: Winner) {
        self.countdown.stop();
        if let Some(team) = self.state.attempting() {
            self.mark(DisplayField::attempt(team));
        }
        self.attempt.reset();
        self.winner = Some(winner);
        self.indicators = Indicators::for_winner(winner);
        self.enter(GameState::GameOver);
    }

    /// Everything back to power-on values, minus the LCD script.
    fn restart(&mut self) {
        self.countdown.set_minutes(self.config.default_game_minutes);
        self.possession.reset();
        self.attempt.reset();
        self.signal.reset();
        self.scoreboard.reset();
        self.winner = None;
        self.indicators = Indicators::default();
        self.dirty = PendingFields::all();
        self.previous = GameState::Init;
        self.enter(GameState::Init);
    }

    fn enter(&mut self, next: GameState) {
        self.state = next;
    }

    fn mark(&mut self, field: DisplayField) {
        self.dirty.insert(field);
    }

    /// Hand stale fields to the display.
    pub fn take_dirty(&mut self) -> PendingFields {
        self.dirty.take()
    }

    /// Number currently belonging in `field`.
    pub fn field_value(&self, field: DisplayField) -> u8 {
        match field {
            DisplayField::GreenScore => self.scoreboard.score(Team::Green),
            DisplayField::RedScore => self.scoreboard.score(Team::Red),
            DisplayField::PossessionMinutes => self.possession.minutes(),
            DisplayField::PossessionSeconds => self.possession.seconds(),
            DisplayField::GreenAttempt | DisplayField::RedAttempt => {
                let shown = if field == DisplayField::attempt(Team::Red) { Team::Red } else { Team::Green };
                if self.state.attempting() == Some(shown) {
                    self.attempt.seconds()
                } else {
                    0
                }
            }
            DisplayField::CountdownMinutes => self.countdown.minutes(),
            DisplayField::CountdownSeconds => self.countdown.seconds(),
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn previous(&self) -> GameState {
        self.previous
    }

    pub fn indicators(&self) -> Indicators {
        self.indicators
    }

    pub fn winner(&self) -> Option<Winner> {
        self.winner
    }

    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    pub fn countdown(&self) -> &CountdownClock {
        &self.countdown
    }

    pub fn possession(&self) -> &PossessionClock {
        &self.possession
    }

    pub fn attempt(&self) -> &AttemptClock {
        &self.attempt
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}
