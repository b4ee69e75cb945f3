use embedded_hal::digital::v2::OutputPin;

use crate::game::{Indicators, Team};

/// The two team flag LEDs, driven active high.
pub struct FlagLeds<R, G> {
    red: R,
    green: G,
    lit: Indicators,
}

impl<R, G, E> FlagLeds<R, G>
where
    R: OutputPin<Error = E>,
    G: OutputPin<Error = E>,
{
    /// Takes both pins and switches the flags off.
    pub fn new(red: R, green: G) -> Result<Self, E> {
        let mut leds = FlagLeds {
            red,
            green,
            lit: Indicators::default(),
        };
        leds.set(Team::Red, false)?;
        leds.set(Team::Green, false)?;
        Ok(leds)
    }

    pub fn set(&mut self, team: Team, on: bool) -> Result<(), E> {
        match (team, on) {
            (Team::Red, true) => self.red.set_high()?,
            (Team::Red, false) => self.red.set_low()?,
            (Team::Green, true) => self.green.set_high()?,
            (Team::Green, false) => self.green.set_low()?,
        }
        self.lit.set(team, on);
        Ok(())
    }

    /// Bring the pins in line with `wanted`, touching only flags that differ.
    pub fn apply(&mut self, wanted: Indicators) -> Result<(), E> {
        for team in Team::BOTH {
            if self.lit.is_on(team) != wanted.is_on(team) {
                self.set(team, wanted.is_on(team))?;
            }
        }
        Ok(())
    }

    pub fn lit(&self) -> Indicators {
        self.lit
    }

    pub fn release(self) -> (R, G) {
        (self.red, self.green)
    }
}
