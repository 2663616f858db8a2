//! Wall-clock helpers

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Current time in Unix milliseconds; a clock set before the epoch reads as 0.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_millis() as u64
}
