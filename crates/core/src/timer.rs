// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timer identifiers for the per-session scheduler.
//!
//! A session owns at most one timer of each kind: the reconnect backoff
//! delay and the gap before the next status poll.

use crate::id::JobId;

crate::define_id! {
    /// Unique identifier for a scheduled timer.
    pub struct TimerId;
}

impl TimerId {
    pub fn reconnect(job_id: &JobId) -> Self {
        TimerKind::Reconnect { job_id: job_id.as_str() }.to_timer_id()
    }

    pub fn poll(job_id: &JobId) -> Self {
        TimerKind::Poll { job_id: job_id.as_str() }.to_timer_id()
    }

    /// Parse this timer ID into a typed `TimerKind`.
    pub fn kind(&self) -> Option<TimerKind<'_>> {
        TimerKind::parse(self.as_str())
    }
}

/// Parsed representation of a timer ID for type-safe routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind<'a> {
    /// Backoff delay before re-opening the live channel.
    Reconnect { job_id: &'a str },
    /// Gap between a poll response and the next request.
    Poll { job_id: &'a str },
}

impl<'a> TimerKind<'a> {
    /// Returns `None` for unrecognized timer ID formats.
    pub fn parse(id: &'a str) -> Option<TimerKind<'a>> {
        if let Some(job_id) = id.strip_prefix("reconnect:") {
            return Some(TimerKind::Reconnect { job_id });
        }
        if let Some(job_id) = id.strip_prefix("poll:") {
            return Some(TimerKind::Poll { job_id });
        }
        None
    }

    pub fn to_timer_id(&self) -> TimerId {
        match self {
            TimerKind::Reconnect { job_id } => TimerId::new(format!("reconnect:{job_id}")),
            TimerKind::Poll { job_id } => TimerId::new(format!("poll:{job_id}")),
        }
    }
}

#[cfg(test)]
#[path = "timer_tests.rs"]
mod tests;
