// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity state surfaced to the presentation layer.

use serde::{Deserialize, Serialize};

/// Lifecycle of the live-update channel for one observation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "state", content = "attempt", rename_all = "snake_case")]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    /// Waiting out the backoff delay before reconnect attempt `n`.
    Reconnecting(u32),
    /// Push channel given up for this session; status arrives by polling.
    Polling,
}

impl ConnectionState {
    /// Whether status updates are currently expected to arrive.
    pub fn is_live(&self) -> bool {
        matches!(self, ConnectionState::Connected | ConnectionState::Polling)
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionState::Disconnected => f.write_str("disconnected"),
            ConnectionState::Connecting => f.write_str("connecting"),
            ConnectionState::Connected => f.write_str("connected"),
            ConnectionState::Reconnecting(n) => write!(f, "reconnecting (attempt {n})"),
            ConnectionState::Polling => f.write_str("polling"),
        }
    }
}
