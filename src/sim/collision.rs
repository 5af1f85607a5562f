//! Catch and boundary tests for falling objects
//!
//! The paddle occupies the bottom row of the board, from `paddle_x` to
//! `paddle_x + paddle_width`, starting at `paddle_top_y`. The catch window
//! is deliberately generous: it opens one object height above the paddle row
//! and extends one object width past the paddle's left edge. The right edge
//! has no tolerance.

use super::state::FallingObject;
use crate::config::BoardConfig;

/// Whether `object` overlaps the paddle at `paddle_x`
#[inline]
pub fn is_caught(object: &FallingObject, paddle_x: i32, board: &BoardConfig) -> bool {
    let paddle_top_y = board.paddle_top_y();
    object.y >= paddle_top_y - board.object_height
        && object.x >= paddle_x - board.object_width
        && object.x <= paddle_x + board.paddle_width
}

/// Whether `object` has reached the bottom edge of the board
#[inline]
pub fn is_off_board(object: &FallingObject, board: &BoardConfig) -> bool {
    object.y >= board.board_height - board.object_height
}

/// Move `object` down by `speed` pixels, saturating at `i32::MAX`
#[inline]
pub fn advance(object: &mut FallingObject, speed: i32) {
    object.y = object.y.saturating_add(speed);
}
