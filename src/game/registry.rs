//! Client-to-paddle slot assignment

use std::collections::HashMap;

use super::arena::Arena;
use super::{ClientId, PadId};

/// Registry errors
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("client {0} has no paddle slot")]
    NotFound(ClientId),
}

/// Maps connected clients to paddle slots. Clients without an entry are
/// spectators. Lives under the same lock as the arena.
#[derive(Debug, Default)]
pub struct PlayerRegistry {
    slots: HashMap<ClientId, PadId>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }

    /// Claim the first inactive slot in pad1..pad4 order. `None` means the
    /// arena is full and the client joins as a spectator; that is a normal
    /// outcome, not an error.
    pub fn assign_slot(&mut self, arena: &mut Arena, client: ClientId) -> Option<PadId> {
        for id in PadId::ALL {
            if !arena.pad(id).active {
                arena.activate(id);
                self.slots.insert(client, id);
                return Some(id);
            }
        }
        None
    }

    /// Give a client's slot back. A pad holding the ball launches it first
    /// so the serve is not left parked against an unattended wall; the pad
    /// then returns to its default position, inactive.
    pub fn release_slot(
        &mut self,
        arena: &mut Arena,
        client: ClientId,
    ) -> Result<PadId, RegistryError> {
        let id = self
            .slots
            .remove(&client)
            .ok_or(RegistryError::NotFound(client))?;
        if arena.pad(id).holds_ball {
            arena.launch(id, true);
        }
        arena.deactivate(id);
        Ok(id)
    }

    pub fn lookup(&self, client: ClientId) -> Option<PadId> {
        self.slots.get(&client).copied()
    }

    pub fn active_players(&self) -> usize {
        self.slots.len()
    }
}
