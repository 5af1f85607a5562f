//! Demo autopilot
//!
//! Chases the lowest falling object. Used by the headless demo as an
//! attract mode; it only ever produces key presses, so it goes through the
//! same throttle and clamp as a human player.

use super::input::Key;
use super::state::FallingObject;
use crate::config::BoardConfig;

/// Pick the key to press this tick, if any.
///
/// Targets the object closest to the paddle row and steers until that
/// object sits fully over the paddle.
pub fn steer(player_x: i32, objects: &[FallingObject], board: &BoardConfig) -> Option<Key> {
    let target = objects.iter().max_by_key(|o| (o.y, std::cmp::Reverse(o.id)))?;

    let lo = player_x;
    let hi = player_x + board.paddle_width - board.object_width;
    if target.x < lo {
        Some(Key::Left)
    } else if target.x > hi {
        Some(Key::Right)
    } else {
        None
    }
}
