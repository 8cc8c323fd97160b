//! JSON protocol for headless factory control.
//!
//! The runner communicates via JSON lines (one JSON object per line):
//!
//! **Input (stdin):** Commands from the controller
//! **Output (stdout):** Responses and state snapshots
//!
//! # Protocol Flow
//!
//! 1. Runner starts, outputs `{"type":"ready","version":"1.0","tick":0}`
//! 2. Controller sends commands as JSON lines
//! 3. Runner answers every command with exactly one response line
//! 4. `quit` (or end of input) ends the session with `{"type":"bye"}`
//!
//! # Example Session
//!
//! ```text
//! <- {"type":"ready","version":"1.0","tick":0}
//! -> {"cmd":"start"}
//! <- {"type":"ack","cmd":"start"}
//! -> {"cmd":"hold","directions":["up","left"]}
//! <- {"type":"ack","cmd":"hold"}
//! -> {"cmd":"tick","count":30}
//! <- {"type":"ack","cmd":"tick"}
//! -> {"cmd":"interact"}
//! <- {"type":"interaction","outcome":{"kind":"nothing_in_range"},"accepted":false,"message":null}
//! -> {"cmd":"hash"}
//! <- {"type":"state_hash","tick":30,"hash":1234567890}
//! ```

use rush_core::interaction::InteractionOutcome;
use rush_core::movement::Direction;
use rush_core::snapshot::SimulationSnapshot;
use serde::{Deserialize, Serialize};

/// Protocol version reported in the `ready` line.
pub const PROTOCOL_VERSION: &str = "1.0";

// ============================================================================
// Input Commands (Controller -> Runner)
// ============================================================================

/// Commands that can be sent to the headless runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Command {
    /// Begin the shift. `now_ms` arms the frame clock (default 0).
    Start {
        #[serde(default)]
        now_ms: u64,
    },

    /// Reset the shift to its initial state.
    Restart,

    /// Replace the set of held movement directions.
    Hold {
        #[serde(default)]
        directions: Vec<Direction>,
    },

    /// Interact with the nearest station.
    Interact,

    /// Advance the simulation by N ticks (default: 1).
    Tick {
        #[serde(default = "default_tick_count")]
        count: u32,
    },

    /// Offer a frame timestamp; a tick runs only if one is due.
    Frame { now_ms: u64 },

    /// Query the current state without advancing time.
    Query,

    /// Request the state hash for determinism checks.
    Hash,

    /// End the session.
    Quit,
}

fn default_tick_count() -> u32 {
    1
}

// ============================================================================
// Output Responses (Runner -> Controller)
// ============================================================================

/// Responses sent from the runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    /// Runner is ready to receive commands.
    Ready { version: String, tick: u64 },

    /// Command acknowledged.
    Ack { cmd: String },

    /// Result of an interact command.
    Interaction {
        outcome: InteractionOutcome,
        accepted: bool,
        message: Option<String>,
    },

    /// Full state snapshot.
    State {
        snapshot: SimulationSnapshot,
        hash: u64,
    },

    /// State hash at a tick.
    StateHash { tick: u64, hash: u64 },

    /// Error processing a command.
    Error {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        cmd: Option<String>,
    },

    /// Session closed.
    Bye,
}

impl Response {
    /// Create a ready response.
    pub fn ready(tick: u64) -> Self {
        Self::Ready {
            version: PROTOCOL_VERSION.to_string(),
            tick,
        }
    }

    /// Create an acknowledgment.
    pub fn ack(cmd: &str) -> Self {
        Self::Ack {
            cmd: cmd.to_string(),
        }
    }

    /// Wrap an interaction outcome.
    pub fn interaction(outcome: InteractionOutcome) -> Self {
        Self::Interaction {
            accepted: outcome.accepted(),
            message: outcome.message(),
            outcome,
        }
    }

    /// Create an error response.
    pub fn error(message: impl Into<String>, cmd: Option<&str>) -> Self {
        Self::Error {
            message: message.into(),
            cmd: cmd.map(String::from),
        }
    }

    /// Serialize to JSON line (with newline).
    pub fn to_json_line(&self) -> String {
        let mut json = serde_json::to_string(self).unwrap_or_else(|e| {
            format!(r#"{{"type":"error","message":"Serialization failed: {e}"}}"#)
        });
        json.push('\n');
        json
    }
}

impl Command {
    /// Parse a command from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Command name as it appears in the `cmd` tag.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start { .. } => "start",
            Self::Restart => "restart",
            Self::Hold { .. } => "hold",
            Self::Interact => "interact",
            Self::Tick { .. } => "tick",
            Self::Frame { .. } => "frame",
            Self::Query => "query",
            Self::Hash => "hash",
            Self::Quit => "quit",
        }
    }
}
