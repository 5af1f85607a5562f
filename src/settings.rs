//! Round settings and the settings store
//!
//! Four tunable parameters, each either a positive integer or unset. The
//! store keeps them as independent observables so the engine and any
//! presentation layer can follow each one separately.

use std::fmt;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::observable::{Observable, Watch};

/// A single setting value. `None` means unset: the dependent subsystem idles.
pub type Setting = Option<NonZeroU32>;

/// The four settings, identified for form labels and error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SettingsField {
    FallSpeed,
    SpawnFrequency,
    PaddleSpeed,
    RoundDuration,
}

impl SettingsField {
    pub const ALL: [SettingsField; 4] = [
        SettingsField::FallSpeed,
        SettingsField::SpawnFrequency,
        SettingsField::PaddleSpeed,
        SettingsField::RoundDuration,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SettingsField::FallSpeed => "fall_speed",
            SettingsField::SpawnFrequency => "spawn_frequency",
            SettingsField::PaddleSpeed => "paddle_speed",
            SettingsField::RoundDuration => "round_duration",
        }
    }

    /// Form label
    pub fn label(&self) -> &'static str {
        match self {
            SettingsField::FallSpeed => "Falling Speed",
            SettingsField::SpawnFrequency => "Falling Frequency",
            SettingsField::PaddleSpeed => "Player Speed",
            SettingsField::RoundDuration => "Game Time",
        }
    }

    /// Form placeholder text
    pub fn placeholder(&self) -> &'static str {
        match self {
            SettingsField::FallSpeed => "Enter falling speed (pixels per tick)",
            SettingsField::SpawnFrequency => "Enter seconds between spawns",
            SettingsField::PaddleSpeed => "Enter player speed (pixels per key press)",
            SettingsField::RoundDuration => "Enter game time (seconds)",
        }
    }
}

impl fmt::Display for SettingsField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a raw form value was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingError {
    #[error("{0:?} is not a whole number")]
    NotInteger(String),
    #[error("value must be at least 1")]
    LessThanMin,
    #[error("{0} is too large")]
    OutOfRange(String),
}

/// A rejected field of a settings form
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {source}")]
pub struct FieldError {
    pub field: SettingsField,
    #[source]
    pub source: SettingError,
}

/// Validate one raw form value.
///
/// Only plain ASCII digits are accepted and the value must be at least 1.
/// An empty field is unset, not an error.
pub fn parse_setting(raw: &str) -> Result<Setting, SettingError> {
    if raw.is_empty() {
        return Ok(None);
    }
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SettingError::NotInteger(raw.to_string()));
    }
    let value: u32 = raw
        .parse()
        .map_err(|_| SettingError::OutOfRange(raw.to_string()))?;
    NonZeroU32::new(value)
        .map(Some)
        .ok_or(SettingError::LessThanMin)
}

/// Validated settings as a plain value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameSettings {
    /// Pixels an object falls per physics tick
    pub fall_speed: Setting,
    /// Seconds between spawns
    pub spawn_frequency_secs: Setting,
    /// Pixels the paddle moves per accepted key press
    pub paddle_speed: Setting,
    /// Round length in seconds
    pub round_duration_secs: Setting,
}

impl GameSettings {
    /// All four fields set
    pub fn is_complete(&self) -> bool {
        self.fall_speed.is_some()
            && self.spawn_frequency_secs.is_some()
            && self.paddle_speed.is_some()
            && self.round_duration_secs.is_some()
    }

    pub fn get(&self, field: SettingsField) -> Setting {
        match field {
            SettingsField::FallSpeed => self.fall_speed,
            SettingsField::SpawnFrequency => self.spawn_frequency_secs,
            SettingsField::PaddleSpeed => self.paddle_speed,
            SettingsField::RoundDuration => self.round_duration_secs,
        }
    }
}

/// Raw, unvalidated form values
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameSettingsForm {
    pub fall_speed: Option<String>,
    pub spawn_frequency: Option<String>,
    pub paddle_speed: Option<String>,
    pub round_duration: Option<String>,
}

impl GameSettingsForm {
    pub fn raw(&self, field: SettingsField) -> Option<&str> {
        match field {
            SettingsField::FallSpeed => self.fall_speed.as_deref(),
            SettingsField::SpawnFrequency => self.spawn_frequency.as_deref(),
            SettingsField::PaddleSpeed => self.paddle_speed.as_deref(),
            SettingsField::RoundDuration => self.round_duration.as_deref(),
        }
    }

    /// Validate every field; the first rejected field is reported
    pub fn validate(&self) -> Result<GameSettings, FieldError> {
        let parse = |field: SettingsField| -> Result<Setting, FieldError> {
            match self.raw(field) {
                None => Ok(None),
                Some(raw) => parse_setting(raw).map_err(|source| FieldError { field, source }),
            }
        };
        Ok(GameSettings {
            fall_speed: parse(SettingsField::FallSpeed)?,
            spawn_frequency_secs: parse(SettingsField::SpawnFrequency)?,
            paddle_speed: parse(SettingsField::PaddleSpeed)?,
            round_duration_secs: parse(SettingsField::RoundDuration)?,
        })
    }
}

/// The live settings, one observable per field.
///
/// Writes are staged; the owner decides when to [`flush`](Self::flush) so
/// settings changes are published together with the engine state they cause.
#[derive(Debug)]
pub struct SettingsStore {
    fall_speed: Observable<Setting>,
    spawn_frequency: Observable<Setting>,
    paddle_speed: Observable<Setting>,
    round_duration: Observable<Setting>,
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsStore {
    /// All settings unset
    pub fn new() -> Self {
        Self {
            fall_speed: Observable::new(None),
            spawn_frequency: Observable::new(None),
            paddle_speed: Observable::new(None),
            round_duration: Observable::new(None),
        }
    }

    fn cell(&self, field: SettingsField) -> &Observable<Setting> {
        match field {
            SettingsField::FallSpeed => &self.fall_speed,
            SettingsField::SpawnFrequency => &self.spawn_frequency,
            SettingsField::PaddleSpeed => &self.paddle_speed,
            SettingsField::RoundDuration => &self.round_duration,
        }
    }

    pub fn get(&self, field: SettingsField) -> Setting {
        self.cell(field).get()
    }

    /// Stage a new value; returns whether it differs from the current one
    pub fn stage(&self, field: SettingsField, value: Setting) -> bool {
        let changed = self.cell(field).stage(value);
        if changed {
            log::debug!("setting {} -> {:?}", field, value.map(NonZeroU32::get));
        }
        changed
    }

    /// Publish every staged field
    pub fn flush(&self) {
        for field in SettingsField::ALL {
            self.cell(field).flush();
        }
    }

    pub fn watch(&self, field: SettingsField) -> Watch<Setting> {
        self.cell(field).watch()
    }

    pub fn fall_speed(&self) -> Setting {
        self.fall_speed.get()
    }

    pub fn spawn_frequency(&self) -> Setting {
        self.spawn_frequency.get()
    }

    pub fn paddle_speed(&self) -> Setting {
        self.paddle_speed.get()
    }

    pub fn round_duration(&self) -> Setting {
        self.round_duration.get()
    }

    pub fn snapshot(&self) -> GameSettings {
        GameSettings {
            fall_speed: self.fall_speed(),
            spawn_frequency_secs: self.spawn_frequency(),
            paddle_speed: self.paddle_speed(),
            round_duration_secs: self.round_duration(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn nz(v: u32) -> Setting {
        NonZeroU32::new(v)
    }

    #[test]
    fn test_parse_setting() {
        assert_eq!(parse_setting("20"), Ok(nz(20)));
        assert_eq!(parse_setting("1"), Ok(nz(1)));
        assert_eq!(parse_setting(""), Ok(None));
        assert_eq!(parse_setting("0"), Err(SettingError::LessThanMin));
        assert_eq!(parse_setting("000"), Err(SettingError::LessThanMin));
        assert!(matches!(parse_setting("-3"), Err(SettingError::NotInteger(_))));
        assert!(matches!(parse_setting("1.5"), Err(SettingError::NotInteger(_))));
        assert!(matches!(parse_setting(" 5"), Err(SettingError::NotInteger(_))));
        assert!(matches!(parse_setting("abc"), Err(SettingError::NotInteger(_))));
        assert!(matches!(
            parse_setting("99999999999"),
            Err(SettingError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_form_validation_reports_field() {
        let form = GameSettingsForm {
            fall_speed: Some("20".into()),
            spawn_frequency: Some("1".into()),
            paddle_speed: Some("0".into()),
            round_duration: None,
        };
        let err = form.validate().unwrap_err();
        assert_eq!(err.field, SettingsField::PaddleSpeed);
        assert_eq!(err.source, SettingError::LessThanMin);
        assert_eq!(err.to_string(), "paddle_speed: value must be at least 1");
    }

    #[test]
    fn test_form_validation_partial() {
        let form = GameSettingsForm {
            fall_speed: Some("20".into()),
            round_duration: Some("5".into()),
            ..Default::default()
        };
        let settings = form.validate().unwrap();
        assert_eq!(settings.fall_speed, nz(20));
        assert_eq!(settings.round_duration_secs, nz(5));
        assert_eq!(settings.paddle_speed, None);
        assert!(!settings.is_complete());
    }

    #[test]
    fn test_store_stages_until_flush() {
        let store = SettingsStore::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _sub = store
            .watch(SettingsField::FallSpeed)
            .subscribe(move |v| sink.borrow_mut().push(*v));

        assert!(store.stage(SettingsField::FallSpeed, nz(20)));
        assert_eq!(*seen.borrow(), vec![None]);
        store.flush();
        assert_eq!(*seen.borrow(), vec![None, nz(20)]);

        assert!(!store.stage(SettingsField::FallSpeed, nz(20)));
        store.flush();
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn test_snapshot() {
        let store = SettingsStore::new();
        store.stage(SettingsField::SpawnFrequency, nz(2));
        store.stage(SettingsField::RoundDuration, nz(30));
        let snap = store.snapshot();
        assert_eq!(snap.spawn_frequency_secs, nz(2));
        assert_eq!(snap.get(SettingsField::RoundDuration), nz(30));
        assert_eq!(snap.fall_speed, None);
    }

    #[test]
    fn test_field_labels() {
        for field in SettingsField::ALL {
            assert!(!field.label().is_empty());
            assert!(!field.placeholder().is_empty());
        }
        assert_eq!(SettingsField::RoundDuration.label(), "Game Time");
    }
}
