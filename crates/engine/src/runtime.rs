// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session runtime: one task per observed job.
//!
//! The task is the only owner of the session's mutable state. Channel
//! bridges and fetch tasks feed it through queues, and it sleeps until the
//! next scheduler deadline in between.

use crate::effect::{Effect, SessionUpdate};
use crate::event::Event;
use crate::executor::{ExecuteError, Executor};
use crate::persistence::JobPersistence;
use crate::session::SessionCore;
use folio_adapters::{ChannelEvent, KeyValueStore, LiveChannel, StatusClient};
use folio_core::{Clock, JobHandle};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

const QUEUE_CAPACITY: usize = 64;

/// Adapters a session runs against
#[derive(Clone)]
pub struct SessionDeps<S, L, K> {
    pub status: S,
    pub channel: L,
    pub persistence: JobPersistence<K>,
}

/// Owner's handle on a running session.
///
/// Dropping the handle cancels the session.
#[derive(Debug)]
pub struct SessionHandle {
    job: JobHandle,
    cancel: CancellationToken,
    done: CancellationToken,
}

impl SessionHandle {
    pub fn job(&self) -> &JobHandle {
        &self.job
    }

    /// Stop observing. Idempotent; the job record is left in place.
    pub fn cancel(&self) {
        if !self.cancel.is_cancelled() {
            tracing::info!(job_id = %self.job.job_id, "cancelling observation");
            self.cancel.cancel();
        }
    }

    /// Whether the session task has finished tearing down.
    pub fn is_finished(&self) -> bool {
        self.done.is_cancelled()
    }

    /// Wait until the session task has torn everything down.
    pub async fn finished(&self) {
        self.done.cancelled().await
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Start observing `handle`. Must be called from within a tokio runtime.
///
/// Updates arrive on the returned receiver; it closes once the session
/// ends, whether by terminal state or cancellation.
pub fn observe<S, L, K, C>(
    handle: JobHandle,
    deps: SessionDeps<S, L, K>,
    poll_interval: Duration,
    clock: C,
) -> (SessionHandle, mpsc::Receiver<SessionUpdate>)
where
    S: StatusClient,
    L: LiveChannel,
    K: KeyValueStore,
    C: Clock,
{
    let (channel_tx, channel_rx) = mpsc::channel(QUEUE_CAPACITY);
    let (event_tx, event_rx) = mpsc::channel(QUEUE_CAPACITY);
    let (updates_tx, updates_rx) = mpsc::channel(QUEUE_CAPACITY);

    let core = SessionCore::new(handle.clone(), deps.persistence, poll_interval);
    let executor = Executor::new(deps.status, deps.channel, channel_tx, event_tx, updates_tx);

    let cancel = CancellationToken::new();
    let done = CancellationToken::new();
    let task = SessionTask {
        core,
        executor,
        clock,
        channel_rx,
        event_rx,
        cancel: cancel.clone(),
        observer_gone: false,
    };
    let task_done = done.clone();
    tokio::spawn(async move {
        task.run().await;
        task_done.cancel();
    });

    (SessionHandle { job: handle, cancel, done }, updates_rx)
}

struct SessionTask<S, L, K, C> {
    core: SessionCore<K>,
    executor: Executor<S, L>,
    clock: C,
    channel_rx: mpsc::Receiver<ChannelEvent>,
    event_rx: mpsc::Receiver<Event>,
    cancel: CancellationToken,
    observer_gone: bool,
}

impl<S, L, K, C> SessionTask<S, L, K, C>
where
    S: StatusClient,
    L: LiveChannel,
    K: KeyValueStore,
    C: Clock,
{
    async fn run(mut self) {
        let effects = self.core.start();
        self.execute_all(effects).await;

        while !self.core.is_stopped() {
            let deadline = self.core.next_deadline();
            let sleep_for = deadline.map(|d| d.saturating_duration_since(self.clock.now()));

            let effects = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => self.core.stop(),
                Some(event) = self.channel_rx.recv() => {
                    self.core.handle_event(Event::Channel(event), self.clock.now())
                }
                Some(event) = self.event_rx.recv() => {
                    self.core.handle_event(event, self.clock.now())
                }
                _ = tokio::time::sleep(sleep_for.unwrap_or_default()), if sleep_for.is_some() => {
                    // The deadline has passed even if the clock lags the timer wheel
                    let now = match deadline {
                        Some(deadline) => deadline.max(self.clock.now()),
                        None => self.clock.now(),
                    };
                    self.core.fire_timers(now)
                }
            };
            self.execute_all(effects).await;
        }

        self.executor.shutdown().await;
        tracing::debug!(job_id = %self.core.handle().job_id, "session task exited");
    }

    /// Execute effects in order. A notify blocked on a full update queue
    /// gives way to cancellation; the remaining effects are dropped and
    /// `Executor::shutdown` releases whatever they would have touched.
    async fn execute_all(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            if self.observer_gone && matches!(effect, Effect::Notify { .. }) {
                continue;
            }
            let result = tokio::select! {
                biased;
                result = self.executor.execute(effect) => result,
                _ = self.cancel.cancelled() => {
                    tracing::debug!(
                        job_id = %self.core.handle().job_id,
                        "cancelled while executing effects"
                    );
                    return;
                }
            };
            if let Err(ExecuteError::ObserverGone) = result {
                // Observer dropped its receiver; run on until terminal or cancel
                self.observer_gone = true;
            }
        }
    }
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
