// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Live-update channel keyed by job id.
//!
//! Opening a channel spawns a bridge task that reports its lifecycle and
//! every inbound text frame as [`ChannelEvent`]s. Each open is tagged with
//! a [`ConnectionId`] so the session can tell a superseded channel's late
//! events from the current one.

mod ws;

pub use ws::WsLiveChannel;

use folio_core::JobId;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

const CLOSE_GRACE: Duration = Duration::from_secs(2);

/// Identifies one open attempt of the live channel within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub u64);

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Lifecycle and payload events from one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    /// Handshake completed
    Opened { conn: ConnectionId },
    /// One inbound text frame (expected to be a JSON snapshot)
    Frame { conn: ConnectionId, text: String },
    /// Channel failed to open, errored, or was closed by the server
    Closed { conn: ConnectionId, reason: Option<String> },
}

impl ChannelEvent {
    pub fn conn(&self) -> ConnectionId {
        match self {
            ChannelEvent::Opened { conn }
            | ChannelEvent::Frame { conn, .. }
            | ChannelEvent::Closed { conn, .. } => *conn,
        }
    }
}

/// Adapter for opening live-update channels
pub trait LiveChannel: Clone + Send + Sync + 'static {
    /// Start opening a channel for `job_id`. Returns immediately; the outcome
    /// arrives on `events` as `Opened` or `Closed`.
    fn open(
        &self,
        job_id: &JobId,
        conn: ConnectionId,
        events: mpsc::Sender<ChannelEvent>,
    ) -> ChannelHandle;
}

/// Owner of one open (or opening) channel.
///
/// Closing or dropping the handle stops the bridge task; no further events
/// are sent for its connection afterwards.
pub struct ChannelHandle {
    conn: ConnectionId,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl ChannelHandle {
    pub fn new(conn: ConnectionId, shutdown: oneshot::Sender<()>, task: JoinHandle<()>) -> Self {
        Self { conn, shutdown: Some(shutdown), task: Some(task) }
    }

    /// Handle with no bridge task, for adapters that deliver events themselves.
    pub fn detached(conn: ConnectionId, shutdown: oneshot::Sender<()>) -> Self {
        Self { conn, shutdown: Some(shutdown), task: None }
    }

    pub fn conn(&self) -> ConnectionId {
        self.conn
    }

    pub fn close(mut self) {
        self.shutdown_now();
    }

    fn shutdown_now(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(mut task) = self.task.take() {
            // The bridge sends a close frame when it sees the shutdown signal;
            // give it that chance before forcing it down.
            match tokio::runtime::Handle::try_current() {
                Ok(runtime) => {
                    let conn = self.conn;
                    runtime.spawn(async move {
                        if tokio::time::timeout(CLOSE_GRACE, &mut task).await.is_err() {
                            tracing::debug!(%conn, "channel bridge did not stop in time, aborting");
                            task.abort();
                        }
                    });
                }
                Err(_) => task.abort(),
            }
        }
    }
}

impl Drop for ChannelHandle {
    fn drop(&mut self) {
        self.shutdown_now();
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{ChannelEvent, ChannelHandle, ConnectionId, LiveChannel};
    use folio_core::JobId;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use tokio::sync::{mpsc, oneshot};

    /// Recorded open request
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct OpenCall {
        pub job_id: JobId,
        pub conn: ConnectionId,
    }

    struct OpenChannel {
        call: OpenCall,
        events: mpsc::Sender<ChannelEvent>,
        shutdown: oneshot::Receiver<()>,
    }

    /// Fake live channel: records opens and lets tests inject events
    #[derive(Clone, Default)]
    pub struct FakeLiveChannel {
        inner: Arc<Mutex<Vec<OpenChannel>>>,
    }

    impl FakeLiveChannel {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn opens(&self) -> Vec<OpenCall> {
            self.inner.lock().iter().map(|c| c.call.clone()).collect()
        }

        /// Deliver an event as if it came from the channel opened as `event.conn()`.
        pub async fn emit(&self, event: ChannelEvent) -> bool {
            let tx = self
                .inner
                .lock()
                .iter()
                .find(|c| c.call.conn == event.conn())
                .map(|c| c.events.clone());
            match tx {
                Some(tx) => tx.send(event).await.is_ok(),
                None => false,
            }
        }

        /// Whether the handle for `conn` has been closed or dropped.
        pub fn is_closed(&self, conn: ConnectionId) -> bool {
            let mut inner = self.inner.lock();
            match inner.iter_mut().find(|c| c.call.conn == conn) {
                Some(c) => !matches!(
                    c.shutdown.try_recv(),
                    Err(oneshot::error::TryRecvError::Empty)
                ),
                None => false,
            }
        }
    }

    impl LiveChannel for FakeLiveChannel {
        fn open(
            &self,
            job_id: &JobId,
            conn: ConnectionId,
            events: mpsc::Sender<ChannelEvent>,
        ) -> ChannelHandle {
            let (tx, rx) = oneshot::channel();
            self.inner.lock().push(OpenChannel {
                call: OpenCall { job_id: job_id.clone(), conn },
                events,
                shutdown: rx,
            });
            ChannelHandle::detached(conn, tx)
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeLiveChannel, OpenCall};

#[cfg(test)]
#[path = "ws_tests.rs"]
mod tests;
