//! Armed wake-signal port.
//!
//! The scheduler hands the platform's notification service a best-effort
//! one-shot wake signal for the next occurrence. Arming always fully
//! supersedes the previous signal -- at most one is outstanding -- and a
//! user tap on the delivered alert comes back into the core as
//! [`TriggerSource::Notification`](crate::events::TriggerSource).

use std::path::PathBuf;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, PersistenceError};
use crate::media::VideoId;

const ARMED_SIGNAL_FILE: &str = "armed_signal.toml";

/// A one-shot wake signal scheduled ahead of the target time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WakeSignal {
    pub id: Uuid,
    pub fire_at: DateTime<Local>,
    /// Resolved video id, when the reference parses, so the platform
    /// deliverer can deep-link the alert.
    pub video_id: Option<VideoId>,
}

impl WakeSignal {
    pub fn new(fire_at: DateTime<Local>, video_id: Option<VideoId>) -> Self {
        Self {
            id: Uuid::new_v4(),
            fire_at,
            video_id,
        }
    }
}

/// Best-effort local notification service.
pub trait Notifier {
    /// Schedule a wake signal, replacing any previously armed one.
    ///
    /// # Errors
    /// Returns an error if the signal cannot be handed to the service;
    /// the alarm itself still works through the foreground tick.
    fn arm(&self, signal: &WakeSignal) -> Result<(), CoreError>;

    /// Remove any armed signal.
    ///
    /// # Errors
    /// Returns an error if the service rejects the cancellation.
    fn cancel_all(&self) -> Result<(), CoreError>;
}

/// Notifier that persists the armed signal as a whole-record TOML file for
/// the platform shell to deliver.
#[derive(Debug)]
pub struct FileNotifier {
    path: PathBuf,
}

impl FileNotifier {
    /// Notifier writing into the default data directory.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be resolved.
    pub fn new() -> Result<Self, PersistenceError> {
        Ok(Self::at_dir(crate::storage::data_dir()?))
    }

    /// Notifier writing into an explicit directory.
    pub fn at_dir(dir: PathBuf) -> Self {
        Self {
            path: dir.join(ARMED_SIGNAL_FILE),
        }
    }

    /// The currently armed signal, if one exists and parses.
    pub fn armed(&self) -> Option<WakeSignal> {
        let content = std::fs::read_to_string(&self.path).ok()?;
        toml::from_str(&content).ok()
    }
}

impl Notifier for FileNotifier {
    fn arm(&self, signal: &WakeSignal) -> Result<(), CoreError> {
        let content = toml::to_string_pretty(signal).map_err(|e| PersistenceError::WriteFailed {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&self.path, content).map_err(|e| PersistenceError::WriteFailed {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    fn cancel_all(&self) -> Result<(), CoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PersistenceError::WriteFailed {
                path: self.path.clone(),
                message: e.to_string(),
            }
            .into()),
        }
    }
}

/// Notifier that records arm/cancel calls.
///
/// Test double for the platform notification service.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub armed: std::cell::RefCell<Vec<WakeSignal>>,
    pub cancelled: std::cell::Cell<usize>,
}

impl Notifier for RecordingNotifier {
    fn arm(&self, signal: &WakeSignal) -> Result<(), CoreError> {
        self.armed.borrow_mut().push(signal.clone());
        Ok(())
    }

    fn cancel_all(&self) -> Result<(), CoreError> {
        self.cancelled.set(self.cancelled.get() + 1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn arm_supersedes_previous_signal() {
        let dir = tempfile::tempdir().unwrap();
        let notifier = FileNotifier::at_dir(dir.path().to_path_buf());

        let first = WakeSignal::new(Local.with_ymd_and_hms(2026, 8, 7, 7, 0, 0).unwrap(), None);
        let second = WakeSignal::new(
            Local.with_ymd_and_hms(2026, 8, 8, 6, 30, 0).unwrap(),
            VideoId::new("dQw4w9WgXcQ"),
        );
        notifier.arm(&first).unwrap();
        notifier.arm(&second).unwrap();

        let armed = notifier.armed().unwrap();
        assert_eq!(armed, second);
    }

    #[test]
    fn cancel_all_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let notifier = FileNotifier::at_dir(dir.path().to_path_buf());
        notifier.cancel_all().unwrap();

        let signal = WakeSignal::new(Local.with_ymd_and_hms(2026, 8, 7, 7, 0, 0).unwrap(), None);
        notifier.arm(&signal).unwrap();
        notifier.cancel_all().unwrap();
        assert!(notifier.armed().is_none());
        notifier.cancel_all().unwrap();
    }
}
