use super::{Team, Winner};

/// Highest score the two-digit display can show.
pub const MAX_SCORE: u8 = 99;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Scoreboard {
    red: u8,
    green: u8,
}

impl Scoreboard {
    pub const fn new() -> Self {
        Self { red: 0, green: 0 }
    }

    /// Add one point for `team`, holding at the display limit.
    pub fn credit(&mut self, team: Team) {
        let score = match team {
            Team::Red => &mut self.red,
            Team::Green => &mut self.green,
        };
        if *score < MAX_SCORE {
            *score += 1;
        }
    }

    pub fn score(&self, team: Team) -> u8 {
        match team {
            Team::Red => self.red,
            Team::Green => self.green,
        }
    }

    /// Winner when time runs out.
    pub fn leader(&self) -> Winner {
        use core::cmp::Ordering;

        match self.red.cmp(&self.green) {
            Ordering::Greater => Winner::Red,
            Ordering::Less => Winner::Green,
            Ordering::Equal => Winner::Tie,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leader_by_comparison() {
        let mut board = Scoreboard::new();
        assert_eq!(board.leader(), Winner::Tie);
        board.credit(Team::Green);
        assert_eq!(board.leader(), Winner::Green);
        board.credit(Team::Red);
        board.credit(Team::Red);
        assert_eq!(board.leader(), Winner::Red);
    }

    #[test]
    fn score_holds_at_limit() {
        let mut board = Scoreboard::new();
        for _ in 0..120 {
            board.credit(Team::Red);
        }
        assert_eq!(board.score(Team::Red), MAX_SCORE);
        assert_eq!(board.score(Team::Green), 0);
    }
}
