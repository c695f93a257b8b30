//! Alarm scheduler.
//!
//! Owns the validated view of the alarm configuration and the firing
//! decision. Like the ramp engine it keeps no timers of its own: the caller
//! ticks it once a second while foregrounded, and `reconcile` compensates
//! for whatever the platform suspended in between.

use chrono::{DateTime, Duration, Local, NaiveDateTime, NaiveTime, Timelike};
use tracing::warn;

use crate::storage::AlarmConfig;

/// Scheduling state over an [`AlarmConfig`].
#[derive(Debug)]
pub struct AlarmScheduler {
    config: AlarmConfig,
    /// Parsed target time; `None` when a hand-edited record does not parse,
    /// which degrades the alarm to never-matching rather than failing.
    target: Option<NaiveTime>,
    next_occurrence: Option<DateTime<Local>>,
    /// Minute that last fired, so one matching minute fires at most once
    /// even if playback is stopped inside it.
    fired_minute: Option<NaiveDateTime>,
}

impl AlarmScheduler {
    pub fn new(config: AlarmConfig, now: DateTime<Local>) -> Self {
        let target = match config.target_time() {
            Ok(t) => Some(t),
            Err(e) => {
                warn!(error = %e, "stored alarm time does not parse, alarm will not fire");
                None
            }
        };
        let mut scheduler = Self {
            config,
            target,
            next_occurrence: None,
            fired_minute: None,
        };
        scheduler.recompute(now);
        scheduler
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn config(&self) -> &AlarmConfig {
        &self.config
    }

    pub fn enabled(&self) -> bool {
        self.config.enabled && self.target.is_some()
    }

    /// Next wall-clock instant the alarm is due, while enabled.
    pub fn next_occurrence(&self) -> Option<DateTime<Local>> {
        self.next_occurrence
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Replace the configuration and recompute the schedule.
    ///
    /// The caller validates and persists the record first; a config that
    /// reaches this point always carries a parseable target time.
    pub fn set_config(&mut self, config: AlarmConfig, now: DateTime<Local>) {
        self.target = config.target_time().ok();
        self.config = config;
        self.fired_minute = None;
        self.recompute(now);
    }

    /// The 1-second cadence. Returns true when the alarm should fire.
    ///
    /// Matching is second-agnostic: any tick inside the target minute
    /// matches, and the fired-minute latch makes the match fire at most
    /// once. The caller additionally skips firing while already Playing.
    pub fn tick(&mut self, now: DateTime<Local>) -> bool {
        if !self.config.enabled {
            return false;
        }
        let Some(target) = self.target else {
            return false;
        };
        if now.hour() != target.hour() || now.minute() != target.minute() {
            return false;
        }

        let minute = truncate_to_minute(now);
        if self.fired_minute == Some(minute) {
            return false;
        }
        self.fired_minute = Some(minute);
        self.recompute(now + Duration::minutes(1));
        true
    }

    /// Foreground/resume reconciliation.
    ///
    /// Recomputes the next occurrence; the caller restarts its cadence
    /// unconditionally. Matches missed while suspended are not retro-fired
    /// here -- the armed notification is the path that covers them. A
    /// resume inside the target minute still matches on the next tick,
    /// since that is a live match rather than a missed one.
    pub fn reconcile(&mut self, now: DateTime<Local>) {
        self.recompute(now);
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn recompute(&mut self, now: DateTime<Local>) {
        self.next_occurrence = if self.config.enabled {
            self.target.and_then(|t| next_occurrence_of(t, now))
        } else {
            None
        };
    }
}

fn truncate_to_minute(now: DateTime<Local>) -> NaiveDateTime {
    now.naive_local()
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or_else(|| now.naive_local())
}

/// Next wall-clock instant at or after `now` whose time of day is `target`,
/// rolling to the following day when today's match has already passed.
///
/// Instants that do not exist locally (DST spring-forward) roll forward to
/// the next day that has them.
pub(crate) fn next_occurrence_of(target: NaiveTime, now: DateTime<Local>) -> Option<DateTime<Local>> {
    for days_ahead in 0..=2 {
        let date = now.date_naive() + Duration::days(days_ahead);
        if let Some(candidate) = date.and_time(target).and_local_timezone(Local).earliest() {
            if candidate >= now {
                return Some(candidate);
            }
        }
    }
    None
}
