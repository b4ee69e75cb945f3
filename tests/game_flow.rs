//! Whole-board runs: events through the queue, the game, the LCD and LEDs.

use std::convert::Infallible;

use embedded_hal::digital::v2::OutputPin;
use seize_secure::application::Application;
use seize_secure::config::GameConfig;
use seize_secure::drivers::{ButtonEvent, Control, FlagLeds, LcdBus, NibbleWrite, Register};
use seize_secure::game::{GameState, Indicators, Team, Winner};
use seize_secure::logger::Trace;
use seize_secure::os::{Event, EventQueue};
use seize_secure::Error;
use ufmt::uWrite;

const TPS: u16 = 50;

/// Character model of the HD44780: tracks 4-bit mode, the address counter
/// and DDRAM contents.
struct Hd44780 {
    ddram: [u8; 128],
    address: usize,
    four_bit: bool,
    half: Option<(Register, u8)>,
    writes: usize,
}

impl Hd44780 {
    fn new() -> Self {
        Self {
            ddram: [b' '; 128],
            address: 0,
            four_bit: false,
            half: None,
            writes: 0,
        }
    }

    fn byte(&mut self, register: Register, byte: u8) {
        match register {
            Register::Data => {
                self.ddram[self.address] = byte;
                self.address = (self.address + 1) & 0x7F;
            }
            Register::Command if byte & 0x80 != 0 => self.address = (byte & 0x7F) as usize,
            Register::Command if byte == 0x01 => {
                self.ddram = [b' '; 128];
                self.address = 0;
            }
            Register::Command => {}
        }
    }

    fn row(&self, row: usize) -> String {
        let base = if row == 1 { 0x00 } else { 0x40 };
        String::from_utf8(self.ddram[base..base + 16].to_vec()).unwrap()
    }
}

impl LcdBus for Hd44780 {
    type Error = Infallible;

    fn write_nibble(&mut self, write: NibbleWrite) -> Result<(), Infallible> {
        self.writes += 1;
        if !self.four_bit {
            assert_eq!(write.register, Register::Command);
            if write.nibble == 0x2 {
                self.four_bit = true;
            }
            return Ok(());
        }
        match self.half.take() {
            None => self.half = Some((write.register, write.nibble)),
            Some((register, high)) => {
                assert_eq!(register, write.register, "byte split across registers");
                self.byte(register, high << 4 | write.nibble);
            }
        }
        Ok(())
    }
}

#[derive(Default)]
struct Level(bool);

impl OutputPin for Level {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0 = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0 = true;
        Ok(())
    }
}

#[derive(Default)]
struct Capture(String);

impl uWrite for Capture {
    type Error = Infallible;

    fn write_str(&mut self, s: &str) -> Result<(), Infallible> {
        self.0.push_str(s);
        Ok(())
    }
}

type Board = Application<Hd44780, Level, Level, Capture>;

fn board() -> Board {
    let leds = FlagLeds::new(Level::default(), Level::default()).unwrap();
    Application::new(
        GameConfig::default().with_ticks_per_second(TPS),
        Hd44780::new(),
        leds,
        Some(Trace::new(Capture::default())),
    )
}

/// Queue `events` the way the interrupt handlers do, then drain them.
fn feed(board: &mut Board, events: &[Event]) {
    let mut queue = EventQueue::new();
    for event in events {
        queue.push(*event).unwrap();
    }
    while let Ok(event) = queue.pop() {
        board.handle(event).unwrap();
    }
}

fn press(board: &mut Board, control: Control) {
    feed(board, &[Event::Edge(ButtonEvent::Pressed(control))]);
}

fn release(board: &mut Board, control: Control) {
    feed(board, &[Event::Edge(ButtonEvent::Released(control))]);
}

fn ticks(board: &mut Board, n: u32) {
    for _ in 0..n {
        board.handle(Event::Tick).unwrap();
    }
}

fn seconds(board: &mut Board, n: u32) {
    ticks(board, n * TPS as u32);
}

/// Tick until every stale field is on screen.
fn settle(board: &mut Board) {
    for _ in 0..100 {
        if board.display().is_idle() {
            return;
        }
        ticks(board, 1);
    }
    panic!("display never went idle");
}

fn boot(board: &mut Board) {
    for _ in 0..200 {
        if board.game().state() == GameState::Init {
            break;
        }
        ticks(board, 1);
    }
    assert_eq!(board.game().state(), GameState::Init);
    settle(board);
}

fn screen(board: &Board) -> (String, String) {
    (board.lcd().row(1), board.lcd().row(2))
}

fn start(board: &mut Board) {
    press(board, Control::Enter);
    seconds(board, 6);
    assert_eq!(board.game().state(), GameState::Idle);
}

#[test]
fn power_on_draws_template_after_settling() {
    let mut board = board();
    ticks(&mut board, 12);
    assert_eq!(board.lcd().writes, 0);
    assert!(board.display().in_script());

    // inputs are ignored until the template is up
    press(&mut board, Control::Enter);
    press(&mut board, Control::Up);

    boot(&mut board);
    assert_eq!(
        screen(&board),
        ("G 00 T02:00 R 00".into(), "  0   F0:00   0 ".into())
    );
}

#[test]
fn possession_win_after_contest() {
    let mut board = board();
    boot(&mut board);

    press(&mut board, Control::Up);
    press(&mut board, Control::Up);
    settle(&mut board);
    assert_eq!(board.lcd().row(1), "G 00 T04:00 R 00");

    start(&mut board);
    assert_eq!(board.leds().lit(), Indicators::default());

    press(&mut board, Control::RedTake);
    seconds(&mut board, 6);
    assert_eq!(board.game().state(), GameState::RedOwns);
    release(&mut board, Control::RedTake);

    seconds(&mut board, 10);
    settle(&mut board);
    assert_eq!(
        screen(&board),
        ("G 00 T03:44 R 01".into(), "  0   F0:10   0 ".into())
    );
    assert_eq!(board.leds().lit(), Indicators { red: true, green: false });

    press(&mut board, Control::GreenTake);
    seconds(&mut board, 6);
    assert_eq!(board.game().state(), GameState::GreenOwns);
    assert_eq!(board.game().scoreboard().score(Team::Red), 1);
    release(&mut board, Control::GreenTake);

    seconds(&mut board, 120);
    assert_eq!(board.game().state(), GameState::GameOver);
    assert_eq!(board.game().winner(), Some(Winner::Green));
    settle(&mut board);
    assert_eq!(
        screen(&board),
        ("G 12 T01:39 R 01".into(), "  0   F2:00   0 ".into())
    );
    assert_eq!(board.leds().lit(), Indicators { red: false, green: true });

    // nothing but Up leaves the result screen
    seconds(&mut board, 5);
    press(&mut board, Control::Enter);
    assert_eq!(board.game().state(), GameState::GameOver);

    press(&mut board, Control::Up);
    assert_eq!(board.game().state(), GameState::Init);
    settle(&mut board);
    assert_eq!(
        screen(&board),
        ("G 00 T02:00 R 00".into(), "  0   F0:00   0 ".into())
    );
    assert_eq!(board.leds().lit(), Indicators::default());

    let (_, _, trace) = board.release();
    let log = trace.unwrap().release().0;
    assert!(log.starts_with("[SYS] Seize & Secure v"));
    assert!(log.contains("[GAME] Startup -> Init\r\n"));
    assert!(log.contains("[SETUP] game length 4 min\r\n"));
    assert!(log.contains("[GAME] RedAttempt -> RedOwns\r\n"));
    assert!(log.contains("[GAME] GreenAttemptWhileRedOwns -> GreenOwns\r\n"));
    assert!(log.contains("[GAME] winner GREEN G12 R1\r\n"));
    assert!(log.ends_with("[GAME] GameOver -> Init\r\n"));
}

#[test]
fn failed_contest_keeps_owner() {
    let mut board = board();
    boot(&mut board);
    start(&mut board);

    press(&mut board, Control::GreenTake);
    seconds(&mut board, 6);
    assert_eq!(board.game().state(), GameState::GreenOwns);

    press(&mut board, Control::RedTake);
    assert_eq!(board.game().state(), GameState::RedAttemptWhileGreenOwns);
    seconds(&mut board, 1);
    assert_eq!(board.leds().lit(), Indicators { red: true, green: true });
    seconds(&mut board, 1);
    assert_eq!(board.leds().lit(), Indicators { red: false, green: true });
    settle(&mut board);
    assert_eq!(board.lcd().row(2), "  0   F0:02   2 ");

    release(&mut board, Control::RedTake);
    assert_eq!(board.game().state(), GameState::GreenOwns);
    settle(&mut board);
    assert_eq!(board.lcd().row(2), "  0   F0:02   0 ");
    assert_eq!(board.leds().lit(), Indicators { red: false, green: true });
}

#[test]
fn expiry_during_attempt_clears_attempt_digit() {
    let mut board = board();
    boot(&mut board);
    start(&mut board);

    seconds(&mut board, 116);
    ticks(&mut board, 25);
    press(&mut board, Control::RedTake);
    seconds(&mut board, 3);
    settle(&mut board);
    assert_eq!(board.lcd().row(2), "  0   F0:00   3 ");

    for _ in 0..TPS {
        if board.game().state() == GameState::GameOver {
            break;
        }
        ticks(&mut board, 1);
    }
    assert_eq!(board.game().state(), GameState::GameOver);
    assert_eq!(board.game().winner(), Some(Winner::Tie));
    settle(&mut board);
    assert_eq!(
        screen(&board),
        ("G 00 T00:00 R 00".into(), "  0   F0:00   0 ".into())
    );
}

#[test]
fn countdown_expiry_with_no_owner_is_a_tie() {
    let mut board = board();
    boot(&mut board);
    start(&mut board);

    seconds(&mut board, 119);
    assert_eq!(board.game().state(), GameState::Idle);
    seconds(&mut board, 1);
    assert_eq!(board.game().state(), GameState::GameOver);
    assert_eq!(board.game().winner(), Some(Winner::Tie));
    assert_eq!(board.leds().lit(), Indicators { red: true, green: true });
    settle(&mut board);
    assert_eq!(board.lcd().row(1), "G 00 T00:00 R 00");
}

#[test]
fn overflowing_queue_is_reported() {
    let mut board = board();
    let mut queue = EventQueue::new();
    let accepted = (0..20).filter(|_| queue.push(Event::Tick).is_ok()).count();
    assert_eq!(accepted, 15);
    while let Ok(event) = queue.pop() {
        board.handle(event).unwrap();
    }
    board.note_dropped(queue.take_dropped());

    let (_, _, trace) = board.release();
    assert!(trace.unwrap().release().0.ends_with("[WARN] 5 events dropped\r\n"));
}

/// Accepts a fixed number of writes, then fails.
struct Flaky(u8);

impl OutputPin for Flaky {
    type Error = ();

    fn set_low(&mut self) -> Result<(), ()> {
        self.set_high()
    }

    fn set_high(&mut self) -> Result<(), ()> {
        self.0 = self.0.checked_sub(1).ok_or(())?;
        Ok(())
    }
}

#[test]
fn indicator_failure_does_not_stop_the_game() {
    let leds = FlagLeds::new(Flaky(1), Flaky(1)).unwrap();
    let mut board = Application::new(
        GameConfig::default().with_ticks_per_second(TPS),
        Hd44780::new(),
        leds,
        None::<Trace<Capture>>,
    );
    while board.game().state() != GameState::Init {
        board.handle(Event::Tick).unwrap();
    }
    board.handle(Event::Edge(ButtonEvent::Pressed(Control::Enter))).unwrap();

    for _ in 1..TPS {
        board.handle(Event::Tick).unwrap();
    }
    assert_eq!(board.handle(Event::Tick), Err(Error::Indicator));
    assert_eq!(board.game().state(), GameState::SignalStart);
    assert_eq!(board.game().indicators(), Indicators { red: true, green: true });
}
