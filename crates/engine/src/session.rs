// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Observation session state machine.
//!
//! `SessionCore` binds one job to its connection manager, polling fallback,
//! reconciler and timers. It is synchronous: events go in, effects come
//! out, and time is passed explicitly so tests can drive it with a
//! `FakeClock`. Once stopped it ignores every further input.

use crate::connection::ConnectionManager;
use crate::effect::{Effect, SessionUpdate};
use crate::event::Event;
use crate::persistence::JobPersistence;
use crate::polling::PollingFallback;
use crate::reconciler::{ReconcileResult, StatusReconciler};
use crate::scheduler::Scheduler;
use folio_adapters::KeyValueStore;
use folio_core::{ConnectionState, JobHandle, StatusSnapshot, TimerKind};
use std::time::{Duration, Instant};

pub struct SessionCore<K> {
    handle: JobHandle,
    connection: ConnectionManager,
    polling: Option<PollingFallback>,
    reconciler: StatusReconciler<K>,
    scheduler: Scheduler,
    poll_interval: Duration,
    reported_state: ConnectionState,
    stopped: bool,
}

impl<K: KeyValueStore> SessionCore<K> {
    pub fn new(handle: JobHandle, persistence: JobPersistence<K>, poll_interval: Duration) -> Self {
        Self {
            connection: ConnectionManager::new(handle.job_id.clone()),
            handle,
            polling: None,
            reconciler: StatusReconciler::new(persistence),
            scheduler: Scheduler::new(),
            poll_interval,
            reported_state: ConnectionState::Disconnected,
            stopped: false,
        }
    }

    pub fn handle(&self) -> &JobHandle {
        &self.handle
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.connection.state()
    }

    pub fn view(&self) -> Option<&StatusSnapshot> {
        self.reconciler.view()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn is_polling(&self) -> bool {
        self.polling.as_ref().is_some_and(|p| p.is_active())
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        if self.stopped {
            return None;
        }
        self.scheduler.next_deadline()
    }

    pub fn start(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.stopped {
            return effects;
        }
        tracing::info!(job = %self.handle, "observing job");
        self.connection.start(&mut effects);
        self.report_state(&mut effects);
        effects
    }

    pub fn handle_event(&mut self, event: Event, now: Instant) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.stopped {
            tracing::debug!(event = %event.log_summary(), "session stopped, dropping event");
            return effects;
        }

        match event {
            Event::Channel(channel_event) => {
                let snapshot = self.connection.on_channel_event(
                    channel_event,
                    &mut self.scheduler,
                    now,
                    &mut effects,
                );
                self.report_state(&mut effects);
                if self.connection.state() == ConnectionState::Polling && self.polling.is_none() {
                    self.polling = Some(PollingFallback::start(
                        self.handle.job_id.clone(),
                        self.poll_interval,
                        &mut effects,
                    ));
                }
                if let Some(snapshot) = snapshot {
                    self.apply(snapshot, &mut effects);
                }
            }
            Event::PollResponse { result } => {
                let Some(polling) = self.polling.as_mut() else {
                    tracing::debug!(job_id = %self.handle.job_id, "poll response without polling");
                    return effects;
                };
                match polling.on_response(result, &mut self.scheduler, now) {
                    Some(Ok(snapshot)) => self.apply(snapshot, &mut effects),
                    Some(Err(e)) => effects.push(Effect::Notify {
                        update: SessionUpdate::TransportWarning { message: e.to_string() },
                    }),
                    None => {}
                }
            }
            Event::Timer { id } => match id.kind() {
                Some(TimerKind::Reconnect { .. }) => {
                    self.connection.on_reconnect_timer(&mut effects);
                    self.report_state(&mut effects);
                }
                Some(TimerKind::Poll { .. }) => {
                    if let Some(polling) = self.polling.as_mut() {
                        polling.on_timer(&mut effects);
                    }
                }
                None => tracing::warn!(%id, "unknown timer"),
            },
        }
        effects
    }

    /// Handle every timer due at `now`.
    pub fn fire_timers(&mut self, now: Instant) -> Vec<Effect> {
        let mut effects = Vec::new();
        for id in self.scheduler.fired_timers(now) {
            effects.extend(self.handle_event(Event::Timer { id }, now));
        }
        effects
    }

    /// Tear down: close the channel, report `Disconnected`, cancel polling
    /// and drop all timers. Idempotent.
    pub fn stop(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.stopped {
            return effects;
        }
        self.stopped = true;
        self.connection.stop(&mut self.scheduler, &mut effects);
        self.report_state(&mut effects);
        if let Some(polling) = self.polling.as_mut() {
            polling.cancel(&mut self.scheduler);
        }
        self.scheduler.clear();
        tracing::info!(job_id = %self.handle.job_id, "observation stopped");
        effects
    }

    fn apply(&mut self, snapshot: StatusSnapshot, effects: &mut Vec<Effect>) {
        let revision = self.reconciler.revision();
        match self.reconciler.apply(snapshot) {
            ReconcileResult::Updated => self.notify_view(effects),
            ReconcileResult::Ignored(reason) => {
                tracing::debug!(job_id = %self.handle.job_id, %reason, "snapshot ignored");
                if self.reconciler.revision() != revision {
                    self.notify_view(effects);
                }
            }
            ReconcileResult::Terminal(snapshot) => {
                tracing::info!(
                    job_id = %self.handle.job_id,
                    status = %snapshot.status,
                    progress = snapshot.progress_percent,
                    "job reached terminal state"
                );
                // Terminal is the last update an observer hears
                effects.extend(self.stop());
                effects.push(Effect::Notify { update: SessionUpdate::Terminal { snapshot } });
            }
        }
    }

    fn notify_view(&self, effects: &mut Vec<Effect>) {
        if let Some(view) = self.reconciler.view() {
            effects.push(Effect::Notify { update: SessionUpdate::Snapshot { snapshot: view.clone() } });
        }
    }

    fn report_state(&mut self, effects: &mut Vec<Effect>) {
        let state = self.connection.state();
        if state != self.reported_state {
            self.reported_state = state;
            effects.push(Effect::Notify { update: SessionUpdate::ConnectionState { state } });
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
