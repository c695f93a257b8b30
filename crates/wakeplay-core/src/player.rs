//! Outbound command channel to the embedded media collaborator.
//!
//! Strictly one-way and fire-and-forget: the ramp engine's state is
//! authoritative and never waits for an acknowledgment. The collaborator
//! may post notices back (currently only "ready"); malformed notices are a
//! parse error the caller logs and drops.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::media::VideoId;

/// Message posted to the embedded media collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum PlayerCommand {
    #[serde(rename_all = "camelCase")]
    Play { video_id: VideoId },
    /// Normalized volume in (0, 1].
    SetVolume { volume: f64 },
    Stop,
}

/// Notice posted back by the embedded media collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum PlayerNotice {
    /// The collaborator finished initializing and can receive commands.
    Ready,
}

impl PlayerNotice {
    /// Parse a raw collaborator message.
    ///
    /// # Errors
    /// Returns [`CoreError::MessageParse`] on malformed input; the caller
    /// logs and drops it without touching state.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        serde_json::from_str(raw).map_err(|e| CoreError::MessageParse(e.to_string()))
    }
}

/// One-way outbound channel to the media collaborator.
///
/// Delivery is best-effort; implementations log failures instead of
/// surfacing them, so the state machine never blocks on the receiver.
pub trait PlayerPort {
    fn send(&mut self, cmd: &PlayerCommand);
}

/// Player port that hands the embed URL to the OS default browser.
///
/// `SetVolume`/`Stop` have no reachable receiver once the tab is open;
/// they are logged and dropped, which is all the one-way contract asks for.
#[derive(Debug, Default)]
pub struct BrowserPlayer;

impl PlayerPort for BrowserPlayer {
    fn send(&mut self, cmd: &PlayerCommand) {
        match cmd {
            PlayerCommand::Play { video_id } => {
                let url = video_id.embed_url();
                if let Err(e) = open::that_detached(&url) {
                    warn!(%url, error = %e, "failed to hand playback URL to the browser");
                }
            }
            other => debug!(command = ?other, "no live receiver for command"),
        }
    }
}

/// Player port that records every command, in order.
///
/// Test double for the embedded collaborator.
#[derive(Debug, Default)]
pub struct RecordingPlayer {
    pub sent: Vec<PlayerCommand>,
}

impl PlayerPort for RecordingPlayer {
    fn send(&mut self, cmd: &PlayerCommand) {
        self.sent.push(cmd.clone());
    }
}
