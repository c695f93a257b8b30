//! Playback ramp engine.
//!
//! A wall-clock-based state machine, like the rest of the core: no internal
//! threads or timer handles, the caller invokes `tick()` on its own cadence
//! and every deadline is derived from `started_at`. Leaving the Playing
//! phase clears `started_at`, which releases every pending deadline at once.
//!
//! ## State transitions
//!
//! ```text
//! Idle -> Playing -> Idle
//! ```
//!
//! On entry the media collaborator is started at the lowest volume tier;
//! the volume then rises one step per 30-second boundary up to step 8, and
//! playback auto-stops after 10 minutes unless stopped manually first.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::events::{Event, StopReason, TriggerSource};
use crate::media::VideoId;
use crate::player::{PlayerCommand, PlayerPort};

/// Highest volume step; `step / MAX_VOLUME_STEP` is the normalized volume.
pub const MAX_VOLUME_STEP: u8 = 8;
/// Seconds between volume steps.
pub const STEP_INTERVAL_SECS: i64 = 30;
/// Seconds of playback before the automatic stop.
pub const MAX_PLAYBACK_SECS: i64 = 10 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Playing,
}

/// Ramp state machine driving the embedded media collaborator.
#[derive(Debug)]
pub struct RampEngine {
    phase: Phase,
    /// 1 ..= MAX_VOLUME_STEP; only meaningful while Playing.
    volume_step: u8,
    started_at: Option<DateTime<Utc>>,
    video_id: Option<VideoId>,
    /// Collaborator readiness outlives sessions.
    player_ready: bool,
    /// A session started before the collaborator was ready; the initial
    /// Play is held until the ready notice arrives.
    pending_play: bool,
}

impl Default for RampEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RampEngine {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            volume_step: 1,
            started_at: None,
            video_id: None,
            player_ready: false,
            pending_play: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn volume_step(&self) -> u8 {
        self.volume_step
    }

    /// Normalized volume for the current step, 0.125 ..= 1.0.
    pub fn volume(&self) -> f64 {
        f64::from(self.volume_step) / f64::from(MAX_VOLUME_STEP)
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn video_id(&self) -> Option<&VideoId> {
        self.video_id.as_ref()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Enter the Playing phase.
    ///
    /// A no-op while already Playing, which is what makes duplicate
    /// scheduler ticks and duplicate notification taps harmless.
    pub fn trigger(
        &mut self,
        video_id: VideoId,
        source: TriggerSource,
        now: DateTime<Local>,
        player: &mut dyn PlayerPort,
    ) -> Option<Event> {
        if self.phase == Phase::Playing {
            return None;
        }

        self.phase = Phase::Playing;
        self.volume_step = 1;
        self.started_at = Some(now.with_timezone(&Utc));
        self.video_id = Some(video_id.clone());

        if self.player_ready {
            player.send(&PlayerCommand::Play {
                video_id: video_id.clone(),
            });
            player.send(&PlayerCommand::SetVolume {
                volume: self.volume(),
            });
        } else {
            // Never fire into an uninitialized receiver.
            self.pending_play = true;
        }

        Some(Event::PlaybackStarted {
            source,
            video_id,
            at: now.with_timezone(&Utc),
        })
    }

    /// Advance the ramp. Only acts while Playing.
    ///
    /// Raises the volume by exactly one step per crossed 30-second
    /// boundary, so a catch-up after process suspension still walks the
    /// ladder monotonically, one message per step. Auto-stops once the
    /// session has run for the maximum duration.
    pub fn tick(&mut self, now: DateTime<Local>, player: &mut dyn PlayerPort) -> Vec<Event> {
        if self.phase != Phase::Playing {
            return Vec::new();
        }
        let Some(started_at) = self.started_at else {
            return Vec::new();
        };

        let elapsed_secs = (now.with_timezone(&Utc) - started_at).num_seconds();
        if elapsed_secs >= MAX_PLAYBACK_SECS {
            return self.stop(StopReason::MaxDuration, now, player).into_iter().collect();
        }

        let mut events = Vec::new();
        while self.volume_step < MAX_VOLUME_STEP
            && elapsed_secs >= i64::from(self.volume_step) * STEP_INTERVAL_SECS
        {
            self.volume_step += 1;
            let volume = self.volume();
            player.send(&PlayerCommand::SetVolume { volume });
            events.push(Event::VolumeStepped {
                step: self.volume_step,
                volume,
                at: now.with_timezone(&Utc),
            });
        }
        events
    }

    /// Leave the Playing phase. A no-op from Idle.
    ///
    /// Exactly one Stop is sent, the step resets to 1, and the start time
    /// is cleared -- dropping every deadline derived from it.
    pub fn stop(
        &mut self,
        reason: StopReason,
        now: DateTime<Local>,
        player: &mut dyn PlayerPort,
    ) -> Option<Event> {
        if self.phase != Phase::Playing {
            return None;
        }

        let at_step = self.volume_step;
        self.phase = Phase::Idle;
        self.volume_step = 1;
        self.started_at = None;
        self.video_id = None;
        self.pending_play = false;
        player.send(&PlayerCommand::Stop);

        Some(Event::PlaybackStopped {
            reason,
            at_step,
            at: now.with_timezone(&Utc),
        })
    }

    /// The collaborator reported ready; dispatch a held initial Play.
    pub fn on_player_ready(&mut self, player: &mut dyn PlayerPort) {
        self.player_ready = true;
        if self.pending_play {
            self.pending_play = false;
            if let Some(video_id) = self.video_id.clone() {
                player.send(&PlayerCommand::Play { video_id });
                player.send(&PlayerCommand::SetVolume {
                    volume: self.volume(),
                });
            }
        }
    }
}
