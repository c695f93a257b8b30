//! Whole-record alarm configuration.
//!
//! The alarm is configured as a single TOML record at
//! `~/.config/wakeplay/alarm.toml`: the video locator, the wall-clock
//! target time as a zero-padded `HH:MM` string, and the enablement flag.
//! The record is always read and written as a whole -- no partial updates.

use std::path::{Path, PathBuf};

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::data_dir;
use crate::error::{PersistenceError, ValidationError};

/// Default alarm time used on first run and as the fallback record.
pub const DEFAULT_TARGET_TIME: &str = "07:00";

/// Persisted alarm configuration.
///
/// Serialized to/from TOML at `~/.config/wakeplay/alarm.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmConfig {
    /// Video locator; opaque beyond video-id extraction.
    #[serde(default)]
    pub media_url: String,
    /// Wall-clock time of day, zero-padded `HH:MM`.
    #[serde(default = "default_target_time")]
    pub target_time: String,
    #[serde(default)]
    pub enabled: bool,
}

fn default_target_time() -> String {
    DEFAULT_TARGET_TIME.to_string()
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self {
            media_url: String::new(),
            target_time: default_target_time(),
            enabled: false,
        }
    }
}

/// Parse a zero-padded `HH:MM` string.
///
/// Stricter than chrono's `%H:%M` parsing: both fields must be exactly two
/// digits, so `"7:00"` and `"07:5"` are rejected.
pub(crate) fn parse_hhmm(value: &str) -> Result<NaiveTime, ValidationError> {
    let invalid = || ValidationError::InvalidTimeFormat {
        value: value.to_string(),
    };

    let (hh, mm) = value.split_once(':').ok_or_else(invalid)?;
    if hh.len() != 2 || mm.len() != 2 {
        return Err(invalid());
    }
    if !hh.bytes().all(|b| b.is_ascii_digit()) || !mm.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let hour: u32 = hh.parse().map_err(|_| invalid())?;
    let minute: u32 = mm.parse().map_err(|_| invalid())?;
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)
}

impl AlarmConfig {
    /// Default on-disk location of the record.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be resolved.
    pub fn default_path() -> Result<PathBuf, PersistenceError> {
        Ok(data_dir()?.join("alarm.toml"))
    }

    /// Load from disk, falling back to the default record.
    ///
    /// A missing file is the normal first-run case; a malformed file is
    /// logged and replaced in memory (not on disk) by the defaults. This
    /// never fails the caller and never writes as a side effect.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(cfg) => cfg,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "malformed alarm config, using defaults");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Validate and persist the whole record.
    ///
    /// # Errors
    /// Returns [`ValidationError::InvalidTimeFormat`] without touching disk
    /// if `target_time` is not zero-padded `HH:MM`, and a persistence error
    /// if serializing or writing fails. No retries; the caller re-invokes
    /// save if it wants another attempt.
    pub fn save(&self, path: &Path) -> Result<(), crate::error::CoreError> {
        self.target_time()?;
        let content =
            toml::to_string_pretty(self).map_err(|e| PersistenceError::WriteFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        std::fs::write(path, content).map_err(|e| PersistenceError::WriteFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// The validated target time of day.
    ///
    /// # Errors
    /// Returns an error if the stored string is not zero-padded `HH:MM`.
    /// `save` rejects such records, so this only fails on hand-edited files.
    pub fn target_time(&self) -> Result<NaiveTime, ValidationError> {
        parse_hhmm(&self.target_time)
    }

    /// Get a config value as a string by flat key.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "media_url" => Some(self.media_url.clone()),
            "target_time" => Some(self.target_time.clone()),
            "enabled" => Some(self.enabled.to_string()),
            _ => None,
        }
    }

    /// Set a config value by flat key. Validates before accepting.
    ///
    /// # Errors
    /// Returns an error for unknown keys or values that do not parse.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ValidationError> {
        match key {
            "media_url" => {
                self.media_url = value.to_string();
                Ok(())
            }
            "target_time" => {
                parse_hhmm(value)?;
                self.target_time = value.to_string();
                Ok(())
            }
            "enabled" => {
                self.enabled = value.parse().map_err(|_| ValidationError::InvalidValue {
                    key: key.to_string(),
                    message: format!("cannot parse {value:?} as bool"),
                })?;
                Ok(())
            }
            _ => Err(ValidationError::UnknownKey(key.to_string())),
        }
    }
}
