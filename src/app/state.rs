//! Application state shared across routes

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;

use crate::config::Config;
use crate::game::GameState;
use crate::ws::protocol::Notice;

/// Notices kept for slow subscribers before they start lagging.
const NOTICE_CHANNEL_CAPACITY: usize = 64;

/// Shared application state
///
/// The game sits behind a single mutex: every read-modify-write sequence
/// (physics tick, paddle move with a co-moving ball, slot lifecycle, score
/// reset) is serialized through it. The lock is never held across an await.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub game: Arc<Mutex<GameState>>,
    notices: broadcast::Sender<Notice>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let (notices, _) = broadcast::channel(NOTICE_CHANNEL_CAPACITY);
        Self {
            config: Arc::new(config),
            game: Arc::new(Mutex::new(GameState::new())),
            notices,
        }
    }

    /// Broadcast a notice to every command-channel subscriber. Having no
    /// subscribers is fine.
    pub fn publish(&self, notice: Notice) {
        let _ = self.notices.send(notice);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.notices.subscribe()
    }
}
