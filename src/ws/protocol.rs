//! WebSocket protocol message definitions
//! These are the wire types for client-server communication

use serde::{Deserialize, Serialize};

use crate::game::arena::Arena;
use crate::game::{ClientId, PadId, ScoreTable};

/// Commands accepted on the command channel, one per text frame. The frame
/// payload is the browser key name; anything unrecognized is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `ArrowUp`, valid for vertically moving pads.
    MoveUp,
    /// `ArrowDown`, valid for vertically moving pads.
    MoveDown,
    /// `ArrowLeft`, valid for horizontally moving pads.
    MoveLeft,
    /// `ArrowRight`, valid for horizontally moving pads.
    MoveRight,
    /// `Enter`: launch the held ball.
    Launch,
    /// `Reset`: zero the score table.
    Reset,
}

impl Command {
    pub fn parse(frame: &str) -> Option<Self> {
        match frame {
            "ArrowUp" => Some(Self::MoveUp),
            "ArrowDown" => Some(Self::MoveDown),
            "ArrowLeft" => Some(Self::MoveLeft),
            "ArrowRight" => Some(Self::MoveRight),
            "Enter" => Some(Self::Launch),
            "Reset" => Some(Self::Reset),
            _ => None,
        }
    }
}

/// Server-side notification, structured around the paddle id and client id
/// rather than preformatted strings. Rendered to the `{"info": ...}` wire
/// envelope only at the socket boundary.
#[derive(Debug, Clone)]
pub enum Notice {
    /// A client connected to the command channel.
    Joined { client: ClientId },
    /// A client was assigned a paddle slot.
    SlotAssigned { client: ClientId, pad: PadId },
    /// All four pads are taken; the client watches.
    SpectatorOnly,
    /// A client left the command channel.
    Left { client: ClientId },
    /// The score table changed (point scored or reset).
    Score { scores: ScoreTable },
}

impl Notice {
    /// Score summary for the arena's current table.
    pub fn score(arena: &Arena) -> Self {
        Self::Score {
            scores: arena.scores.clone(),
        }
    }

    /// The human-readable text carried in the info envelope.
    pub fn text(&self) -> String {
        match self {
            Notice::Joined { client } => format!("Client #{client} entered game"),
            Notice::SlotAssigned { client, pad } => format!(
                "Client #{client} you are playing {} {}",
                pad.as_str(),
                pad.edge_label()
            ),
            Notice::SpectatorOnly => "All Pads are in use. You can only watch".to_string(),
            Notice::Left { client } => format!("Client #{client} has left game"),
            Notice::Score { scores } => format!(
                "Score: {}",
                serde_json::to_string(scores).unwrap_or_default()
            ),
        }
    }

    pub fn envelope(&self) -> InfoMsg {
        InfoMsg { info: self.text() }
    }
}

/// The `{"info": <string>}` envelope sent on both channels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfoMsg {
    pub info: String,
}

/// One pad as it appears in a field snapshot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PadSnapshot {
    pub left: i32,
    pub top: i32,
    pub active: bool,
}

/// The ball as it appears in a field snapshot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BallSnapshot {
    pub left: i32,
    pub top: i32,
}

/// The streaming-channel snapshot: pad positions/activity plus the ball.
/// Velocity, serve ownership and scores stay server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSnapshot {
    pub pad1: PadSnapshot,
    pub pad2: PadSnapshot,
    pub pad3: PadSnapshot,
    pub pad4: PadSnapshot,
    pub ball: BallSnapshot,
}

impl FieldSnapshot {
    pub fn capture(arena: &Arena) -> Self {
        let pad = |id: PadId| {
            let pad = arena.pad(id);
            PadSnapshot {
                left: pad.left,
                top: pad.top,
                active: pad.active,
            }
        };
        Self {
            pad1: pad(PadId::Pad1),
            pad2: pad(PadId::Pad2),
            pad3: pad(PadId::Pad3),
            pad4: pad(PadId::Pad4),
            ball: BallSnapshot {
                left: arena.ball.left,
                top: arena.ball.top,
            },
        }
    }
}
