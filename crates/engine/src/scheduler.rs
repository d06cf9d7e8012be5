// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-session timer scheduler.
//!
//! Holds deadlines only; the session task sleeps until [`Scheduler::next_deadline`]
//! and then collects [`Scheduler::fired_timers`].

use folio_core::TimerId;
use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
pub struct Scheduler {
    timers: HashMap<TimerId, Instant>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or replace) a timer to fire `duration` after `now`.
    pub fn set_timer(&mut self, id: TimerId, duration: Duration, now: Instant) {
        self.timers.insert(id, now + duration);
    }

    pub fn cancel_timer(&mut self, id: &TimerId) {
        self.timers.remove(id);
    }

    pub fn is_set(&self, id: &TimerId) -> bool {
        self.timers.contains_key(id)
    }

    /// Remove and return timers due at `now`, earliest first.
    pub fn fired_timers(&mut self, now: Instant) -> Vec<TimerId> {
        let mut due: Vec<(Instant, TimerId)> = Vec::new();
        self.timers.retain(|id, deadline| {
            if *deadline <= now {
                due.push((*deadline, id.clone()));
                false
            } else {
                true
            }
        });
        due.sort();
        due.into_iter().map(|(_, id)| id).collect()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.values().min().copied()
    }

    pub fn has_timers(&self) -> bool {
        !self.timers.is_empty()
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
