//! Edge classification for the four game inputs
//!
//! All inputs are active low with pull-ups. The external interrupt for each
//! line watches one edge at a time: a falling edge is a press, after which
//! the line is flipped to watch for the rising edge (release), and back.
//! There is no timer debounce.

/// Monitored input lines, in handling order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Control {
    RedTake,
    GreenTake,
    Enter,
    Up,
}

impl Control {
    pub const ALL: [Control; 4] = [Control::RedTake, Control::GreenTake, Control::Enter, Control::Up];

    /// Bit of this line in the pending/sense masks (INTn on PDn).
    #[inline]
    pub const fn mask(self) -> u8 {
        1 << self as u8
    }
}

/// Mask covering every monitored line.
pub const ALL_LINES: u8 = 0x0F;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ButtonEvent {
    Pressed(Control),
    Released(Control),
}

/// Events classified out of one edge interrupt, in line order.
#[derive(Clone, Debug, Default)]
pub struct EdgeBatch {
    events: [Option<ButtonEvent>; 4],
    len: usize,
}

impl EdgeBatch {
    fn push(&mut self, event: ButtonEvent) {
        self.events[self.len] = Some(event);
        self.len += 1;
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = ButtonEvent> + '_ {
        self.events[..self.len].iter().flatten().copied()
    }
}

pub struct ButtonHandler {
    /// Lines currently armed for the falling (press) edge
    falling: u8,
    states: [bool; 4],
}

impl ButtonHandler {
    /// Every line starts released and armed for a press.
    pub const fn new() -> Self {
        Self {
            falling: ALL_LINES,
            states: [false; 4],
        }
    }

    /// Classify the lines flagged in `pending` and flip their sensitivity.
    ///
    /// The caller clears every monitored pending flag afterwards, so an edge
    /// on a line that arrives while this runs is lost.
    pub fn classify(&mut self, pending: u8) -> EdgeBatch {
        let mut batch = EdgeBatch::default();
        for control in Control::ALL {
            let bit = control.mask();
            if pending & bit == 0 {
                continue;
            }
            let pressed = self.falling & bit != 0;
            self.states[control as usize] = pressed;
            self.falling ^= bit;
            batch.push(if pressed {
                ButtonEvent::Pressed(control)
            } else {
                ButtonEvent::Released(control)
            });
        }
        batch
    }

    /// Lines that should currently trigger on a falling edge.
    #[inline]
    pub fn falling_mask(&self) -> u8 {
        self.falling
    }

    pub fn is_pressed(&self, control: Control) -> bool {
        self.states[control as usize]
    }
}

impl Default for ButtonHandler {
    fn default() -> Self {
        Self::new()
    }
}
