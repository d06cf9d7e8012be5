// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Effect executor

use crate::effect::{Effect, SessionUpdate};
use crate::event::Event;
use folio_adapters::{ChannelEvent, ChannelHandle, ConnectionId, LiveChannel, StatusClient};
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

/// Errors that can occur during effect execution
#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error("session observer has gone away")]
    ObserverGone,
}

/// Executes session effects using the configured adapters.
///
/// Owns every open channel and in-flight fetch. Dropping the executor
/// releases them as well as [`Executor::shutdown`] does.
pub struct Executor<S, L> {
    status: S,
    channel: L,
    /// Where channel bridges deliver lifecycle and frames
    channel_tx: mpsc::Sender<ChannelEvent>,
    /// Where fetch tasks deliver poll responses
    event_tx: mpsc::Sender<Event>,
    updates: mpsc::Sender<SessionUpdate>,
    channels: HashMap<ConnectionId, ChannelHandle>,
    fetches: JoinSet<()>,
}

impl<S, L> Executor<S, L>
where
    S: StatusClient,
    L: LiveChannel,
{
    pub fn new(
        status: S,
        channel: L,
        channel_tx: mpsc::Sender<ChannelEvent>,
        event_tx: mpsc::Sender<Event>,
        updates: mpsc::Sender<SessionUpdate>,
    ) -> Self {
        Self {
            status,
            channel,
            channel_tx,
            event_tx,
            updates,
            channels: HashMap::new(),
            fetches: JoinSet::new(),
        }
    }

    pub fn open_channels(&self) -> usize {
        self.channels.len()
    }

    pub fn in_flight_fetches(&self) -> usize {
        self.fetches.len()
    }

    /// Execute a single effect with tracing
    pub async fn execute(&mut self, effect: Effect) -> Result<(), ExecuteError> {
        // Format the fields as `key=val`
        let info = effect
            .fields()
            .into_iter()
            .map(|(key, val)| format!("{key}={val}"))
            .collect::<Vec<_>>()
            .join(" ");

        let op = effect.name();
        let verbose = effect.verbose();
        let result = self.execute_inner(effect).await;
        match &result {
            Ok(()) if verbose => tracing::info!("executed effect={} {}", op, info),
            Ok(()) => tracing::debug!("executed effect={} {}", op, info),
            Err(e) => tracing::warn!(error = %e, "error effect={} {}", op, info),
        }
        result
    }

    async fn execute_inner(&mut self, effect: Effect) -> Result<(), ExecuteError> {
        self.reap_fetches();
        match effect {
            Effect::OpenChannel { job_id, conn } => {
                let handle = self.channel.open(&job_id, conn, self.channel_tx.clone());
                if let Some(previous) = self.channels.insert(conn, handle) {
                    previous.close();
                }
                Ok(())
            }

            Effect::CloseChannel { conn } => {
                if let Some(handle) = self.channels.remove(&conn) {
                    handle.close();
                }
                Ok(())
            }

            Effect::FetchStatus { job_id } => {
                let status = self.status.clone();
                let event_tx = self.event_tx.clone();
                self.fetches.spawn(async move {
                    let result = status.fetch(&job_id).await;
                    let _ = event_tx.send(Event::PollResponse { result }).await;
                });
                Ok(())
            }

            Effect::Notify { update } => {
                self.updates.send(update).await.map_err(|_| ExecuteError::ObserverGone)
            }
        }
    }

    /// Close every channel, then abort in-flight fetches and wait for them to unwind.
    pub async fn shutdown(&mut self) {
        for (_, handle) in self.channels.drain() {
            handle.close();
        }
        self.fetches.shutdown().await;
    }

    fn reap_fetches(&mut self) {
        while let Some(result) = self.fetches.try_join_next() {
            if let Err(e) = result {
                if e.is_panic() {
                    tracing::error!(error = %e, "status fetch task panicked");
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
