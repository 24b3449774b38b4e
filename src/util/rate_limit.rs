//! Per-connection command rate limiting

use std::num::NonZeroU32;

use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};

/// Max inbound command frames per second on one command channel. Keyboard
/// auto-repeat lands well under this.
const COMMAND_RATE_LIMIT: u32 = 30;

/// Rate limiter for a single command-channel connection.
pub struct CommandRateLimiter {
    limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
}

impl CommandRateLimiter {
    pub fn new() -> Self {
        let per_second = NonZeroU32::new(COMMAND_RATE_LIMIT).unwrap_or(NonZeroU32::MIN);
        Self {
            limiter: RateLimiter::direct(Quota::per_second(per_second)),
        }
    }

    /// True when the frame is within budget.
    pub fn check(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

impl Default for CommandRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
