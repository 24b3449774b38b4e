//! Game simulation modules

pub mod arena;
pub mod physics;
pub mod registry;
pub mod state;

pub use arena::{Arena, Ball, Pad, PadId, ScoreTable};
pub use physics::Physics;
pub use registry::{PlayerRegistry, RegistryError};
pub use state::GameState;

/// Command-channel client identifier, taken from the connection URL.
pub type ClientId = u32;

/// Outcome of a tick in which a paddle missed the ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreEvent {
    /// The paddle whose border was breached; it becomes the next server.
    pub missed: PadId,
    /// The paddle credited with the point (most recent touch).
    pub awarded_to: PadId,
}
