//! Control frames for the zKillboard websocket.
//!
//! # Protocol
//!
//! 1. The client connects to `wss://zkillboard.com/websocket/`.
//! 2. The client sends one [`KillstreamCommand`] subscribing to the
//!    [`KILLSTREAM_CHANNEL`].
//! 3. The server pushes one killmail JSON body per text frame, each with
//!    its `zkb` sidecar attached.

use serde::{Deserialize, Serialize};

/// Channel carrying every new killmail.
pub const KILLSTREAM_CHANNEL: &str = "killstream";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KillstreamAction {
    Sub,
    Unsub,
}

/// Client-to-server control frame.
///
/// ```json
/// {"action":"sub","channel":"killstream"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KillstreamCommand {
    pub action: KillstreamAction,
    pub channel: String,
}

impl KillstreamCommand {
    pub fn subscribe(channel: impl Into<String>) -> Self {
        Self {
            action: KillstreamAction::Sub,
            channel: channel.into(),
        }
    }
}
