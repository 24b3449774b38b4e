//! The shared game state and its command/join/leave orchestration

use tracing::{debug, info};

use crate::ws::protocol::{Command, Notice};

use super::arena::{Arena, PAD_STEP};
use super::registry::PlayerRegistry;
use super::{ClientId, PadId, Physics, ScoreEvent};

/// Everything behind the single game lock: the arena, the slot registry and
/// the live connection count. Command handlers and the broadcast loop both
/// mutate the game exclusively through this type.
#[derive(Debug, Default)]
pub struct GameState {
    pub arena: Arena,
    pub registry: PlayerRegistry,
}

impl GameState {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            registry: PlayerRegistry::new(),
        }
    }

    /// A new command-channel connection: counted for speed scaling, then
    /// offered a paddle slot. `None` admits the client as a spectator.
    pub fn connect(&mut self, client: ClientId) -> Option<PadId> {
        self.arena.connections += 1;
        self.registry.assign_slot(&mut self.arena, client)
    }

    /// Disconnect or explicit leave. Equivalent for both: the slot is
    /// released (forcing a launch when the pad held the ball) and the
    /// connection leaves the count. Spectators release nothing.
    pub fn disconnect(&mut self, client: ClientId) {
        if self
            .registry
            .release_slot(&mut self.arena, client)
            .is_err()
        {
            debug!(client_id = client, "no slot to release");
        } else {
            info!(client_id = client, "slot released");
        }
        self.arena.connections = self.arena.connections.saturating_sub(1);
    }

    /// Apply one inbound command. Commands from spectators and commands for
    /// the wrong paddle orientation are silently ignored. Returns a notice
    /// when the command produced something to broadcast.
    pub fn command(&mut self, client: ClientId, command: Command) -> Option<Notice> {
        match command {
            Command::MoveUp | Command::MoveDown => {
                if let Some(id) = self.registry.lookup(client) {
                    if id.moves_vertically() {
                        let delta = match command {
                            Command::MoveUp => -PAD_STEP,
                            _ => PAD_STEP,
                        };
                        self.arena.move_pad(id, delta);
                    }
                }
                None
            }
            Command::MoveLeft | Command::MoveRight => {
                if let Some(id) = self.registry.lookup(client) {
                    if !id.moves_vertically() {
                        let delta = match command {
                            Command::MoveLeft => -PAD_STEP,
                            _ => PAD_STEP,
                        };
                        self.arena.move_pad(id, delta);
                    }
                }
                None
            }
            Command::Launch => {
                if let Some(id) = self.registry.lookup(client) {
                    if self.arena.pad(id).holds_ball {
                        self.arena.launch(id, false);
                        info!(client_id = client, pad = id.as_str(), "ball launched");
                    }
                }
                None
            }
            Command::Reset => {
                self.arena.reset_scores();
                info!(client_id = client, "scores reset");
                Some(Notice::score(&self.arena))
            }
        }
    }

    /// One physics step; run by the broadcast loop.
    pub fn tick(&mut self) -> Option<ScoreEvent> {
        Physics::tick(&mut self.arena)
    }
}
