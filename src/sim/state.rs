//! Game state and core simulation types

use serde::{Deserialize, Serialize};

/// Lifecycle of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoundPhase {
    /// No round duration set; countdown, physics and spawning are stopped
    #[default]
    Idle,
    /// Countdown active
    Running,
}

/// An object falling toward the paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallingObject {
    pub id: u32,
    /// Left edge, fixed at spawn
    pub x: i32,
    /// Top edge, grows every tick
    pub y: i32,
}

impl FallingObject {
    pub fn new(id: u32, x: i32) -> Self {
        Self { id, x, y: 0 }
    }
}
