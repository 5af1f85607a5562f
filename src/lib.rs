//! Paddle Catch - a timed catch-the-falling-objects arcade game
//!
//! Core modules:
//! - `sim`: Simulation engine (physics tick, collisions, timers, round state machine)
//! - `settings`: The four tunable round parameters and their form validation
//! - `observable`: Single-writer broadcast cells with last-value replay
//! - `relay`: Periodic score/time status snapshots
//! - `game`: Event loop driving the engine and relay on a virtual clock
//! - `config`: Board geometry and timing configuration

pub mod config;
pub mod game;
pub mod observable;
pub mod relay;
pub mod settings;
pub mod sim;

pub use config::{BoardConfig, ConfigError};
pub use game::Game;
pub use observable::{Observable, Subscription, Watch};
pub use relay::{StatusRelay, StatusSnapshot};
pub use settings::{GameSettings, GameSettingsForm, Setting, SettingError, SettingsStore};

/// Game configuration constants
pub mod consts {
    /// Board dimensions (pixels)
    pub const BOARD_WIDTH: i32 = 500;
    pub const BOARD_HEIGHT: i32 = 600;

    /// Paddle width; the paddle sits on the bottom row of the board
    pub const PADDLE_WIDTH: i32 = 100;

    /// Falling object box
    pub const OBJECT_WIDTH: i32 = 20;
    pub const OBJECT_HEIGHT: i32 = 20;

    /// Rightmost paddle position
    pub const MAX_PLAYER_X: i32 = BOARD_WIDTH - PADDLE_WIDTH;
    /// Paddle starts (and is reset to) the horizontal centre
    pub const INITIAL_PLAYER_X: i32 = MAX_PLAYER_X / 2;

    /// Fixed physics tick (also the key-repeat throttle window)
    pub const TICK_INTERVAL_MS: u64 = 50;
    /// Round countdown step
    pub const COUNTDOWN_INTERVAL_MS: u64 = 1000;
    /// Status relay sampling period
    pub const STATUS_SAMPLE_INTERVAL_MS: u64 = 1000;
}
