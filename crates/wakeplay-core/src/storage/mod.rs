mod config;

pub use config::{AlarmConfig, DEFAULT_TARGET_TIME};

use std::path::PathBuf;

use crate::error::PersistenceError;

/// Returns `~/.config/wakeplay[-dev]/` based on WAKEPLAY_ENV.
///
/// Set WAKEPLAY_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, PersistenceError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("WAKEPLAY_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("wakeplay-dev")
    } else {
        base_dir.join("wakeplay")
    };

    std::fs::create_dir_all(&dir).map_err(|e| PersistenceError::WriteFailed {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}
