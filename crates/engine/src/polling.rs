// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pull-based status loop used once the live channel is given up.
//!
//! One request goes out immediately; the next is scheduled `interval` after
//! each response, so requests never overlap. The loop ends by itself after
//! a terminal snapshot, or when its cancellation token fires.

use crate::effect::Effect;
use crate::scheduler::Scheduler;
use folio_adapters::StatusError;
use folio_core::{JobId, StatusSnapshot, TimerId};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

pub struct PollingFallback {
    job_id: JobId,
    interval: Duration,
    token: CancellationToken,
    in_flight: bool,
    finished: bool,
}

impl PollingFallback {
    /// Start polling `job_id`, issuing the first request now.
    pub fn start(job_id: JobId, interval: Duration, effects: &mut Vec<Effect>) -> Self {
        tracing::info!(%job_id, ?interval, "polling started");
        effects.push(Effect::FetchStatus { job_id: job_id.clone() });
        Self { job_id, interval, token: CancellationToken::new(), in_flight: true, finished: false }
    }

    /// Token that stops the loop when cancelled.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn is_active(&self) -> bool {
        !self.finished && !self.token.is_cancelled()
    }

    /// Returns the response to surface, or `None` once the loop has ended.
    pub fn on_response(
        &mut self,
        result: Result<StatusSnapshot, StatusError>,
        scheduler: &mut Scheduler,
        now: Instant,
    ) -> Option<Result<StatusSnapshot, StatusError>> {
        self.in_flight = false;
        if !self.is_active() {
            tracing::debug!(job_id = %self.job_id, "dropping poll response after polling ended");
            return None;
        }
        match &result {
            Ok(snapshot) if snapshot.is_terminal() => {
                tracing::info!(job_id = %self.job_id, status = %snapshot.status, "polling finished");
                self.finished = true;
            }
            Ok(_) => scheduler.set_timer(TimerId::poll(&self.job_id), self.interval, now),
            Err(e) => {
                tracing::warn!(job_id = %self.job_id, error = %e, "status poll failed, will retry");
                scheduler.set_timer(TimerId::poll(&self.job_id), self.interval, now);
            }
        }
        Some(result)
    }

    /// The poll interval elapsed.
    pub fn on_timer(&mut self, effects: &mut Vec<Effect>) {
        if !self.is_active() || self.in_flight {
            return;
        }
        self.in_flight = true;
        effects.push(Effect::FetchStatus { job_id: self.job_id.clone() });
    }

    /// Stop the loop. Safe to call repeatedly and after self-termination.
    pub fn cancel(&mut self, scheduler: &mut Scheduler) {
        self.token.cancel();
        scheduler.cancel_timer(&TimerId::poll(&self.job_id));
    }
}

#[cfg(test)]
#[path = "polling_tests.rs"]
mod tests;
