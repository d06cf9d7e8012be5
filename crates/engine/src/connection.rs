// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Live-channel lifecycle for one observation session.
//!
//! ```text
//! Disconnected -> Connecting -> Connected
//!                     ^   |         |
//!                     |   v         v
//!               Reconnecting(n) <---+      (n > MAX) -> Polling
//! ```
//!
//! Channel I/O happens in the executor; the manager only requests
//! `OpenChannel` / `CloseChannel` effects and arms the backoff timer.

use crate::backoff::{reconnect_delay, MAX_RECONNECT_ATTEMPTS};
use crate::effect::Effect;
use crate::scheduler::Scheduler;
use folio_adapters::{ChannelEvent, ConnectionId};
use folio_core::{ConnectionState, JobId, StatusSnapshot, TimerId};
use std::time::Instant;

pub struct ConnectionManager {
    job_id: JobId,
    state: ConnectionState,
    /// Consecutive failures since the last successful open
    attempt: u32,
    current: Option<ConnectionId>,
    next_conn: u64,
}

impl ConnectionManager {
    pub fn new(job_id: JobId) -> Self {
        Self {
            job_id,
            state: ConnectionState::Disconnected,
            attempt: 0,
            current: None,
            next_conn: 1,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn current_conn(&self) -> Option<ConnectionId> {
        self.current
    }

    /// Begin connecting. No-op unless disconnected.
    pub fn start(&mut self, effects: &mut Vec<Effect>) {
        if self.state != ConnectionState::Disconnected {
            return;
        }
        self.attempt = 0;
        self.open(effects);
    }

    /// Returns the parsed snapshot for a frame on the current channel.
    pub fn on_channel_event(
        &mut self,
        event: ChannelEvent,
        scheduler: &mut Scheduler,
        now: Instant,
        effects: &mut Vec<Effect>,
    ) -> Option<StatusSnapshot> {
        if Some(event.conn()) != self.current {
            tracing::debug!(
                job_id = %self.job_id,
                conn = %event.conn(),
                "ignoring event from superseded channel"
            );
            return None;
        }

        match event {
            ChannelEvent::Opened { conn } => {
                if self.state == ConnectionState::Connecting {
                    tracing::info!(job_id = %self.job_id, %conn, "live channel connected");
                    self.state = ConnectionState::Connected;
                    self.attempt = 0;
                }
                None
            }
            ChannelEvent::Frame { conn, text } => match StatusSnapshot::from_json(&text) {
                Ok(snapshot) => Some(snapshot),
                Err(e) => {
                    tracing::warn!(
                        job_id = %self.job_id,
                        %conn,
                        error = %e,
                        bytes = text.len(),
                        "dropping malformed status frame"
                    );
                    None
                }
            },
            ChannelEvent::Closed { conn, reason } => {
                tracing::warn!(
                    job_id = %self.job_id,
                    %conn,
                    reason = reason.as_deref().unwrap_or("closed by server"),
                    "live channel lost"
                );
                self.on_failure(scheduler, now, effects);
                None
            }
        }
    }

    /// The backoff delay elapsed.
    pub fn on_reconnect_timer(&mut self, effects: &mut Vec<Effect>) {
        if let ConnectionState::Reconnecting(attempt) = self.state {
            tracing::info!(job_id = %self.job_id, attempt, "reconnecting live channel");
            self.open(effects);
        }
    }

    /// Tear down. Idempotent.
    pub fn stop(&mut self, scheduler: &mut Scheduler, effects: &mut Vec<Effect>) {
        scheduler.cancel_timer(&TimerId::reconnect(&self.job_id));
        if let Some(conn) = self.current.take() {
            effects.push(Effect::CloseChannel { conn });
        }
        self.state = ConnectionState::Disconnected;
    }

    fn open(&mut self, effects: &mut Vec<Effect>) {
        let conn = ConnectionId(self.next_conn);
        self.next_conn += 1;
        self.current = Some(conn);
        self.state = ConnectionState::Connecting;
        effects.push(Effect::OpenChannel { job_id: self.job_id.clone(), conn });
    }

    fn on_failure(&mut self, scheduler: &mut Scheduler, now: Instant, effects: &mut Vec<Effect>) {
        if let Some(conn) = self.current.take() {
            effects.push(Effect::CloseChannel { conn });
        }
        self.attempt += 1;
        if self.attempt > MAX_RECONNECT_ATTEMPTS {
            tracing::warn!(
                job_id = %self.job_id,
                attempts = self.attempt - 1,
                "reconnect attempts exhausted, falling back to polling"
            );
            self.state = ConnectionState::Polling;
            return;
        }
        let delay = reconnect_delay(self.attempt);
        tracing::info!(job_id = %self.job_id, attempt = self.attempt, ?delay, "scheduling reconnect");
        self.state = ConnectionState::Reconnecting(self.attempt);
        scheduler.set_timer(TimerId::reconnect(&self.job_id), delay, now);
    }
}

#[cfg(test)]
#[path = "connection_tests.rs"]
mod tests;
