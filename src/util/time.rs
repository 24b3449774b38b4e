//! Time utilities for the broadcast loop and uptime reporting

use std::time::{Duration, Instant};

/// Broadcast/physics rate: one tick every 33 ms, ~30 Hz.
pub const TICK_RATE_HZ: u32 = 30;
pub const TICK_INTERVAL: Duration = Duration::from_millis(33);

/// Server start time for uptime tracking
static SERVER_START: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();

/// Initialize server start time (call once at startup)
pub fn init_server_time() {
    SERVER_START.get_or_init(Instant::now);
}

/// Get server uptime in seconds
pub fn uptime_secs() -> u64 {
    SERVER_START
        .get()
        .map(|start| start.elapsed().as_secs())
        .unwrap_or(0)
}
