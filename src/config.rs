//! Board geometry and timing configuration
//!
//! Defaults come from [`crate::consts`]; a JSON override may set any subset
//! of fields.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors loading or validating a [`BoardConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid board config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: i64 },
    #[error("{inner} ({inner_size}) does not fit inside {outer} ({outer_size})")]
    DoesNotFit {
        inner: &'static str,
        inner_size: i32,
        outer: &'static str,
        outer_size: i32,
    },
}

/// Board dimensions, object sizes and process intervals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub board_width: i32,
    pub board_height: i32,
    pub paddle_width: i32,
    pub object_width: i32,
    pub object_height: i32,
    pub tick_interval_ms: u64,
    pub countdown_interval_ms: u64,
    pub status_sample_interval_ms: u64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            board_width: BOARD_WIDTH,
            board_height: BOARD_HEIGHT,
            paddle_width: PADDLE_WIDTH,
            object_width: OBJECT_WIDTH,
            object_height: OBJECT_HEIGHT,
            tick_interval_ms: TICK_INTERVAL_MS,
            countdown_interval_ms: COUNTDOWN_INTERVAL_MS,
            status_sample_interval_ms: STATUS_SAMPLE_INTERVAL_MS,
        }
    }
}

impl BoardConfig {
    /// Parse and validate a JSON config. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that every dimension and interval is positive and that the
    /// paddle and objects fit on the board.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let dims = [
            ("board_width", self.board_width as i64),
            ("board_height", self.board_height as i64),
            ("paddle_width", self.paddle_width as i64),
            ("object_width", self.object_width as i64),
            ("object_height", self.object_height as i64),
        ];
        for (field, value) in dims {
            if value <= 0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        let intervals = [
            ("tick_interval_ms", self.tick_interval_ms),
            ("countdown_interval_ms", self.countdown_interval_ms),
            ("status_sample_interval_ms", self.status_sample_interval_ms),
        ];
        for (field, value) in intervals {
            if value == 0 {
                return Err(ConfigError::NotPositive { field, value: 0 });
            }
        }

        if self.paddle_width > self.board_width {
            return Err(ConfigError::DoesNotFit {
                inner: "paddle_width",
                inner_size: self.paddle_width,
                outer: "board_width",
                outer_size: self.board_width,
            });
        }
        // Spawn range is [0, board_width - object_width), which must be non-empty
        if self.object_width >= self.board_width {
            return Err(ConfigError::DoesNotFit {
                inner: "object_width",
                inner_size: self.object_width,
                outer: "board_width",
                outer_size: self.board_width,
            });
        }
        if self.object_height >= self.board_height {
            return Err(ConfigError::DoesNotFit {
                inner: "object_height",
                inner_size: self.object_height,
                outer: "board_height",
                outer_size: self.board_height,
            });
        }

        Ok(())
    }

    /// Rightmost paddle position
    pub fn max_player_x(&self) -> i32 {
        self.board_width - self.paddle_width
    }

    /// Horizontal centre position for the paddle
    pub fn initial_player_x(&self) -> i32 {
        self.max_player_x() / 2
    }

    /// Top edge of the paddle row
    pub fn paddle_top_y(&self) -> i32 {
        self.board_height - self.object_height
    }

    /// Exclusive upper bound for spawn x
    pub fn spawn_x_range(&self) -> i32 {
        self.board_width - self.object_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_geometry() {
        let config = BoardConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_player_x(), 400);
        assert_eq!(config.initial_player_x(), 200);
        assert_eq!(config.paddle_top_y(), 580);
        assert_eq!(config.spawn_x_range(), 480);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = BoardConfig::from_json(r#"{ "board_width": 800, "tick_interval_ms": 20 }"#)
            .unwrap();
        assert_eq!(config.board_width, 800);
        assert_eq!(config.tick_interval_ms, 20);
        assert_eq!(config.board_height, BOARD_HEIGHT);
        assert_eq!(config.initial_player_x(), 350);
    }

    #[test]
    fn test_json_round_trip() {
        let config = BoardConfig::default();
        let json = config.to_json().unwrap();
        assert_eq!(BoardConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            BoardConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            BoardConfig::from_json(r#"{ "paddle_width": 0 }"#),
            Err(ConfigError::NotPositive { field: "paddle_width", .. })
        ));
        assert!(matches!(
            BoardConfig::from_json(r#"{ "tick_interval_ms": 0 }"#),
            Err(ConfigError::NotPositive { field: "tick_interval_ms", .. })
        ));
        assert!(matches!(
            BoardConfig::from_json(r#"{ "paddle_width": 600 }"#),
            Err(ConfigError::DoesNotFit { inner: "paddle_width", .. })
        ));
        assert!(matches!(
            BoardConfig::from_json(r#"{ "object_height": 600 }"#),
            Err(ConfigError::DoesNotFit { inner: "object_height", .. })
        ));
    }
}
