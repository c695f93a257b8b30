//! The alarm: scheduler + playback ramp behind one composed state object.
//!
//! [`AlarmClock`] is what the shells hold -- a single-screen, single-user
//! system needs exactly one of these, and every mutation runs on the
//! caller's event loop, so no locking happens here.

mod ramp;
mod scheduler;

pub use ramp::{Phase, RampEngine, MAX_PLAYBACK_SECS, MAX_VOLUME_STEP, STEP_INTERVAL_SECS};
pub use scheduler::AlarmScheduler;

use std::path::PathBuf;

use chrono::{DateTime, Local, Utc};
use tracing::warn;

use crate::error::{CoreError, Result};
use crate::events::{Event, StopReason, TriggerSource};
use crate::media::{extract_video_id, VideoId};
use crate::notify::{Notifier, WakeSignal};
use crate::player::{PlayerNotice, PlayerPort};
use crate::storage::AlarmConfig;

/// Composed application state: configuration, scheduling, playback ramp,
/// and the two collaborator ports.
pub struct AlarmClock<P: PlayerPort, N: Notifier> {
    scheduler: AlarmScheduler,
    ramp: RampEngine,
    player: P,
    notifier: N,
    config_path: PathBuf,
}

impl<P: PlayerPort, N: Notifier> AlarmClock<P, N> {
    /// Load the persisted configuration (or its documented default) and
    /// start Idle.
    pub fn new(config_path: PathBuf, player: P, notifier: N, now: DateTime<Local>) -> Self {
        let config = AlarmConfig::load(&config_path);
        Self {
            scheduler: AlarmScheduler::new(config, now),
            ramp: RampEngine::new(),
            player,
            notifier,
            config_path,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn config(&self) -> &AlarmConfig {
        self.scheduler.config()
    }

    pub fn phase(&self) -> Phase {
        self.ramp.phase()
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Live status readout for the user surface.
    pub fn snapshot(&self, now: DateTime<Local>) -> Event {
        Event::StateSnapshot {
            phase: self.ramp.phase(),
            volume_step: self.ramp.volume_step(),
            volume: self.ramp.volume(),
            playback_started_at: self.ramp.started_at(),
            next_occurrence: self.scheduler.next_occurrence(),
            enabled: self.config().enabled,
            target_time: self.config().target_time.clone(),
            at: now.with_timezone(&Utc),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Validate and persist the whole record, recompute the schedule, and
    /// re-arm (or cancel) the wake signal.
    ///
    /// Arming fully supersedes any previously armed signal. Notifier
    /// failures are logged, not surfaced: the signal is best-effort and the
    /// saved alarm still fires through the foreground tick.
    ///
    /// # Errors
    /// Returns a validation error for a malformed time (nothing persisted,
    /// state unchanged) or a persistence error if the write fails.
    pub fn save(&mut self, config: AlarmConfig, now: DateTime<Local>) -> Result<Event> {
        config.save(&self.config_path)?;
        self.scheduler.set_config(config, now);

        match (self.scheduler.enabled(), self.scheduler.next_occurrence()) {
            (true, Some(next_occurrence)) => {
                let video_id = extract_video_id(&self.config().media_url);
                let signal = WakeSignal::new(next_occurrence, video_id);
                if let Err(e) = self.notifier.arm(&signal) {
                    warn!(error = %e, "failed to arm wake signal");
                }
                Ok(Event::AlarmArmed {
                    next_occurrence,
                    at: now.with_timezone(&Utc),
                })
            }
            _ => {
                if let Err(e) = self.notifier.cancel_all() {
                    warn!(error = %e, "failed to cancel wake signal");
                }
                Ok(Event::AlarmDisarmed {
                    at: now.with_timezone(&Utc),
                })
            }
        }
    }

    /// The steady 1-second cadence while foregrounded: check for a time
    /// match, then advance the ramp.
    pub fn tick(&mut self, now: DateTime<Local>) -> Vec<Event> {
        let mut events = Vec::new();

        if self.scheduler.tick(now) && self.ramp.phase() == Phase::Idle {
            match self.trigger(TriggerSource::Tick, now) {
                Ok(Some(event)) => events.push(event),
                Ok(None) => {}
                // Unconfigured media at fire time: stay Idle, tell the user.
                Err(e) => warn!(error = %e, "alarm fired but could not start playback"),
            }
        }

        events.extend(self.ramp.tick(now, &mut self.player));
        events
    }

    /// Fire the alarm: scheduler match, manual test, or notification tap.
    ///
    /// Idempotent while Playing (returns `Ok(None)`).
    ///
    /// # Errors
    /// Returns [`CoreError::UnconfiguredMedia`] when the reference is empty
    /// or unparseable; the phase stays Idle.
    pub fn trigger(&mut self, source: TriggerSource, now: DateTime<Local>) -> Result<Option<Event>> {
        if self.ramp.phase() == Phase::Playing {
            return Ok(None);
        }
        let video_id = self.resolve_media()?;
        Ok(self.ramp.trigger(video_id, source, now, &mut self.player))
    }

    /// Manual stop. Returns `None` when already Idle.
    pub fn stop(&mut self, now: DateTime<Local>) -> Option<Event> {
        self.ramp.stop(StopReason::Manual, now, &mut self.player)
    }

    /// Foreground/resume reconciliation: recompute the schedule and hand
    /// back a fresh snapshot. The caller restarts its cadence.
    pub fn reconcile(&mut self, now: DateTime<Local>) -> Event {
        self.scheduler.reconcile(now);
        self.snapshot(now)
    }

    /// Handle a raw message posted back by the media collaborator.
    ///
    /// # Errors
    /// Returns [`CoreError::MessageParse`] on malformed input; the caller
    /// logs and drops it, state unchanged.
    pub fn on_player_message(&mut self, raw: &str) -> Result<()> {
        match PlayerNotice::parse(raw)? {
            PlayerNotice::Ready => self.ramp.on_player_ready(&mut self.player),
        }
        Ok(())
    }

    fn resolve_media(&self) -> Result<VideoId> {
        extract_video_id(&self.config().media_url).ok_or_else(|| CoreError::UnconfiguredMedia {
            reference: self.config().media_url.clone(),
        })
    }
}
