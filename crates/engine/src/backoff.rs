// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reconnect backoff schedule for the live channel

use std::time::Duration;

/// Delays before reconnect attempts 1..=5. Later attempts reuse the last entry.
pub const RECONNECT_SCHEDULE: [Duration; 5] = [
    Duration::from_secs(1),
    Duration::from_secs(2),
    Duration::from_secs(5),
    Duration::from_secs(10),
    Duration::from_secs(30),
];

/// Consecutive failures tolerated before handing off to polling
pub const MAX_RECONNECT_ATTEMPTS: u32 = 5;

/// Delay before reconnect attempt `attempt` (1-based).
pub fn reconnect_delay(attempt: u32) -> Duration {
    let index = (attempt.max(1) as usize - 1).min(RECONNECT_SCHEDULE.len() - 1);
    RECONNECT_SCHEDULE[index]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[yare::parameterized(
        first   = { 1, 1 },
        second  = { 2, 2 },
        third   = { 3, 5 },
        fourth  = { 4, 10 },
        fifth   = { 5, 30 },
        beyond  = { 9, 30 },
        zero    = { 0, 1 },
    )]
    fn delay_follows_schedule(attempt: u32, secs: u64) {
        assert_eq!(reconnect_delay(attempt), Duration::from_secs(secs));
    }
}
