//! Keyboard input
//!
//! The engine never listens to a device itself. Key presses reach it through
//! an [`InputSource`] handed to the game at construction.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Paddle control keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value; other keys are ignored
    pub fn from_dom_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(Key::Left),
            "ArrowRight" => Some(Key::Right),
            _ => None,
        }
    }

    /// Horizontal direction (-1 or +1)
    pub fn direction(&self) -> i32 {
        match self {
            Key::Left => -1,
            Key::Right => 1,
        }
    }
}

/// A key press at a point on the virtual clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub at_ms: u64,
    pub key: Key,
}

/// Source of key presses, drained by the game loop in time order
pub trait InputSource {
    /// Remove and return the next press timestamped at or before `until_ms`
    fn next_event(&mut self, until_ms: u64) -> Option<KeyEvent>;
}

/// Never produces input
#[derive(Debug, Default, Clone, Copy)]
pub struct NoInput;

impl InputSource for NoInput {
    fn next_event(&mut self, _until_ms: u64) -> Option<KeyEvent> {
        None
    }
}

/// Shared FIFO of key presses.
///
/// Clones share the same queue: keep one clone to push into and hand the
/// other to the game.
#[derive(Debug, Default, Clone)]
pub struct KeyQueue {
    events: Rc<RefCell<VecDeque<KeyEvent>>>,
}

impl KeyQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a press. Presses must be pushed in non-decreasing time order;
    /// a press earlier than the last queued one is moved up to it.
    pub fn press(&self, at_ms: u64, key: Key) {
        let mut events = self.events.borrow_mut();
        let at_ms = events.back().map_or(at_ms, |last| at_ms.max(last.at_ms));
        events.push_back(KeyEvent { at_ms, key });
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

impl InputSource for KeyQueue {
    fn next_event(&mut self, until_ms: u64) -> Option<KeyEvent> {
        let mut events = self.events.borrow_mut();
        if events.front()?.at_ms <= until_ms {
            events.pop_front()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dom_key_mapping() {
        assert_eq!(Key::from_dom_key("ArrowLeft"), Some(Key::Left));
        assert_eq!(Key::from_dom_key("ArrowRight"), Some(Key::Right));
        assert_eq!(Key::from_dom_key("ArrowUp"), None);
        assert_eq!(Key::Left.direction(), -1);
    }

    #[test]
    fn test_queue_releases_in_time_order() {
        let queue = KeyQueue::new();
        let mut source = queue.clone();
        queue.press(100, Key::Left);
        queue.press(200, Key::Right);

        assert_eq!(source.next_event(99), None);
        assert_eq!(source.next_event(150), Some(KeyEvent { at_ms: 100, key: Key::Left }));
        assert_eq!(source.next_event(150), None);
        assert_eq!(source.next_event(200), Some(KeyEvent { at_ms: 200, key: Key::Right }));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_out_of_order_press_is_clamped() {
        let queue = KeyQueue::new();
        queue.press(500, Key::Left);
        queue.press(100, Key::Right);
        let mut source = queue.clone();
        assert_eq!(source.next_event(499), None);
        source.next_event(500);
        assert_eq!(source.next_event(500).map(|e| e.at_ms), Some(500));
    }
}
