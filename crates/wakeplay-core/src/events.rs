use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::alarm::Phase;
use crate::media::VideoId;

/// What initiated a trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerSource {
    /// The scheduler's tick matched the target minute.
    Tick,
    /// Explicit test action from the user surface.
    Manual,
    /// Tap on the armed wake notification.
    Notification,
}

/// Why playback stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopReason {
    Manual,
    MaxDuration,
}

/// Every state change in the system produces an Event.
/// Shells print or render them; tests assert on them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// The alarm was saved enabled and a wake signal armed.
    AlarmArmed {
        next_occurrence: DateTime<Local>,
        at: DateTime<Utc>,
    },
    /// The alarm was saved disabled; any armed signal is cancelled.
    AlarmDisarmed {
        at: DateTime<Utc>,
    },
    /// A trigger entered the Playing phase.
    PlaybackStarted {
        source: TriggerSource,
        video_id: VideoId,
        at: DateTime<Utc>,
    },
    /// The ramp raised the volume one step.
    VolumeStepped {
        /// 1 ..= 8.
        step: u8,
        /// step / 8, so 0.125 ..= 1.0.
        volume: f64,
        at: DateTime<Utc>,
    },
    /// Playing returned to Idle.
    PlaybackStopped {
        reason: StopReason,
        /// The step the ramp had reached when playback ended.
        at_step: u8,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: Phase,
        volume_step: u8,
        volume: f64,
        playback_started_at: Option<DateTime<Utc>>,
        next_occurrence: Option<DateTime<Local>>,
        enabled: bool,
        target_time: String,
        at: DateTime<Utc>,
    },
}
