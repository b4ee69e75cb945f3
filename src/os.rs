//! Event queue between the interrupt handlers and the main loop
//!
//! Handlers only push. The main loop is the single consumer and runs every
//! state machine action to completion before taking the next event, so
//! game state is never touched from two contexts at once.

use crate::config::EVENT_QUEUE_SIZE;
use crate::drivers::ButtonEvent;
use core::convert::Infallible;

// Queue size must be power of 2 for efficient masking
const QUEUE_MASK: usize = EVENT_QUEUE_SIZE - 1;
const _: () = assert!(EVENT_QUEUE_SIZE.is_power_of_two());

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Sensor or control line changed level
    Edge(ButtonEvent),
    /// Periodic timer interrupt
    Tick,
}

/// Fixed ring of pending events. One slot stays free to tell full from empty.
pub struct EventQueue {
    data: [Event; EVENT_QUEUE_SIZE],
    write_idx: usize,
    read_idx: usize,
    dropped: u16,
}

impl EventQueue {
    pub const fn new() -> Self {
        Self {
            data: [Event::Tick; EVENT_QUEUE_SIZE],
            write_idx: 0,
            read_idx: 0,
            dropped: 0,
        }
    }

    /// Append `event`, handing it back if the queue is full.
    pub fn push(&mut self, event: Event) -> Result<(), Event> {
        let next_write = (self.write_idx + 1) & QUEUE_MASK;
        if next_write != self.read_idx {
            self.data[self.write_idx] = event;
            self.write_idx = next_write;
            Ok(())
        } else {
            self.dropped = self.dropped.saturating_add(1);
            Err(event)
        }
    }

    /// Oldest pending event, or `WouldBlock` when drained.
    pub fn pop(&mut self) -> nb::Result<Event, Infallible> {
        if self.read_idx != self.write_idx {
            let event = self.data[self.read_idx];
            self.read_idx = (self.read_idx + 1) & QUEUE_MASK;
            Ok(event)
        } else {
            Err(nb::Error::WouldBlock)
        }
    }

    pub fn len(&self) -> usize {
        self.write_idx.wrapping_sub(self.read_idx) & QUEUE_MASK
    }

    pub fn is_empty(&self) -> bool {
        self.read_idx == self.write_idx
    }

    /// Events lost to a full queue since the last call.
    pub fn take_dropped(&mut self) -> u16 {
        core::mem::take(&mut self.dropped)
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::Control;

    #[test]
    fn delivers_in_arrival_order() {
        let mut queue = EventQueue::new();
        let press = Event::Edge(ButtonEvent::Pressed(Control::RedTake));
        queue.push(Event::Tick).unwrap();
        queue.push(press).unwrap();
        queue.push(Event::Tick).unwrap();

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.pop(), Ok(Event::Tick));
        assert_eq!(queue.pop(), Ok(press));
        assert_eq!(queue.pop(), Ok(Event::Tick));
        assert_eq!(queue.pop(), Err(nb::Error::WouldBlock));
    }

    #[test]
    fn full_queue_rejects_and_counts() {
        let mut queue = EventQueue::new();
        for _ in 0..EVENT_QUEUE_SIZE - 1 {
            queue.push(Event::Tick).unwrap();
        }
        let late = Event::Edge(ButtonEvent::Released(Control::Up));
        assert_eq!(queue.push(late), Err(late));
        assert_eq!(queue.take_dropped(), 1);
        assert_eq!(queue.take_dropped(), 0);

        // wraps around after draining
        while queue.pop().is_ok() {}
        queue.push(late).unwrap();
        assert_eq!(queue.pop(), Ok(late));
        assert!(queue.is_empty());
    }
}
