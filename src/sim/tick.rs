//! Fixed-interval physics tick
//!
//! Moves every live object, then sorts each into caught, missed or still
//! falling in a single pass.

use super::collision::{advance, is_caught, is_off_board};
use super::state::FallingObject;
use crate::config::BoardConfig;
use crate::settings::Setting;

/// What one tick removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickOutcome {
    /// Objects that landed on the paddle (one point each)
    pub caught: u32,
    /// Objects that left the bottom of the board
    pub missed: u32,
}

impl TickOutcome {
    pub fn removed(&self) -> u32 {
        self.caught + self.missed
    }
}

/// Advance `objects` by one tick.
///
/// Objects move first (if a fall speed is set) and are then judged on their
/// new position. A caught object is never also counted as missed. Surviving
/// objects keep their order.
pub fn tick(
    objects: &mut Vec<FallingObject>,
    paddle_x: i32,
    fall_speed: Setting,
    board: &BoardConfig,
) -> TickOutcome {
    if let Some(speed) = fall_speed {
        let speed = i32::try_from(speed.get()).unwrap_or(i32::MAX);
        for object in objects.iter_mut() {
            advance(object, speed);
        }
    }

    let mut outcome = TickOutcome::default();
    objects.retain(|object| {
        if is_caught(object, paddle_x, board) {
            log::debug!("object {} caught at x={}", object.id, object.x);
            outcome.caught += 1;
            false
        } else if is_off_board(object, board) {
            log::trace!("object {} missed", object.id);
            outcome.missed += 1;
            false
        } else {
            true
        }
    });
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroU32;

    fn obj(id: u32, x: i32, y: i32) -> FallingObject {
        FallingObject { id, x, y }
    }

    #[test]
    fn test_tick_moves_before_judging() {
        let board = BoardConfig::default();
        // 550 + 20 = 570 lands in the catch window only after moving
        let mut objects = vec![obj(1, 250, 550)];
        let outcome = tick(&mut objects, 200, NonZeroU32::new(20), &board);
        assert_eq!(outcome, TickOutcome { caught: 1, missed: 0 });
        assert!(objects.is_empty());
    }

    #[test]
    fn test_tick_sorts_caught_missed_live() {
        let board = BoardConfig::default();
        let mut objects = vec![
            obj(1, 0, 570),   // far left of paddle, falls off
            obj(2, 250, 545), // caught
            obj(3, 10, 100),  // live
            obj(4, 250, 0),   // live
        ];
        let outcome = tick(&mut objects, 200, NonZeroU32::new(20), &board);
        assert_eq!(outcome.caught, 1);
        assert_eq!(outcome.missed, 1);
        assert_eq!(outcome.removed(), 2);
        assert_eq!(objects, vec![obj(3, 10, 120), obj(4, 250, 20)]);
    }

    #[test]
    fn test_tick_without_fall_speed_still_filters() {
        let board = BoardConfig::default();
        let mut objects = vec![obj(1, 250, 565), obj(2, 250, 300)];
        let outcome = tick(&mut objects, 200, None, &board);
        assert_eq!(outcome.caught, 1);
        assert_eq!(objects, vec![obj(2, 250, 300)]);
    }

    #[test]
    fn test_huge_fall_speed_removes_without_overflow() {
        let board = BoardConfig::default();
        let mut objects = vec![obj(1, 0, 300), obj(2, 250, 10)];
        tick(&mut objects, 200, NonZeroU32::new(100), &board);
        let outcome = tick(&mut objects, 200, NonZeroU32::new(u32::MAX), &board);
        assert_eq!(outcome, TickOutcome { caught: 1, missed: 1 });
        assert!(objects.is_empty());
    }

    #[test]
    fn test_caught_wins_over_off_board() {
        let board = BoardConfig::default();
        let mut objects = vec![obj(1, 210, 590)];
        let outcome = tick(&mut objects, 200, None, &board);
        assert_eq!(outcome, TickOutcome { caught: 1, missed: 0 });
    }
}
