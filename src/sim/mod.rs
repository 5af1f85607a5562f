//! Simulation module
//!
//! All gameplay logic lives here:
//! - Fixed tick only (virtual clock, no wall time)
//! - Seeded RNG only
//! - Objects kept in spawn order
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod engine;
pub mod input;
pub mod scheduler;
pub mod state;
pub mod tick;

pub use collision::{advance, is_caught, is_off_board};
pub use engine::Engine;
pub use input::{InputSource, Key, KeyEvent, KeyQueue};
pub use scheduler::{Scheduler, Task, TimerId, TimerSlot};
pub use state::{FallingObject, RoundPhase};
pub use tick::{TickOutcome, tick};
