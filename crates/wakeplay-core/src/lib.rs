//! # Wakeplay Core Library
//!
//! Core logic for Wakeplay, a video alarm clock: at the configured
//! wall-clock time the alarm resolves its video reference, starts the
//! embedded media collaborator, and ramps the volume from the lowest tier
//! to full before auto-stopping. All operations are available through a
//! standalone CLI binary; any GUI is a thin layer over this same library.
//!
//! ## Architecture
//!
//! - **Alarm clock**: wall-clock-based state machines (scheduler + playback
//!   ramp) that require the caller to invoke `tick()` once a second
//! - **Storage**: TOML-based whole-record configuration
//! - **Player channel**: one-way fire-and-forget commands to the embedded
//!   media collaborator
//! - **Wake signal**: best-effort one-shot notification armed for the next
//!   occurrence
//!
//! ## Key Components
//!
//! - [`AlarmClock`]: composed application state the shells hold
//! - [`AlarmScheduler`] / [`RampEngine`]: the two state machines
//! - [`AlarmConfig`]: persisted configuration record
//! - [`PlayerPort`] / [`Notifier`]: collaborator ports

pub mod alarm;
pub mod error;
pub mod events;
pub mod media;
pub mod notify;
pub mod player;
pub mod storage;

pub use alarm::{AlarmClock, AlarmScheduler, Phase, RampEngine};
pub use error::{CoreError, PersistenceError, Result, ValidationError};
pub use events::{Event, StopReason, TriggerSource};
pub use media::{extract_video_id, VideoId};
pub use notify::{FileNotifier, Notifier, WakeSignal};
pub use player::{BrowserPlayer, PlayerCommand, PlayerNotice, PlayerPort};
pub use storage::AlarmConfig;
