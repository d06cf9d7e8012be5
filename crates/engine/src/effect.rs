// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Side effects requested by an observation session, and the updates it
//! publishes to its observer.

use folio_adapters::ConnectionId;
use folio_core::{ConnectionState, JobId, StatusSnapshot};
use serde::Serialize;

/// What the presentation layer hears from a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionUpdate {
    /// The reconciled view changed
    Snapshot { snapshot: StatusSnapshot },
    ConnectionState { state: ConnectionState },
    /// A status request failed; polling carries on
    TransportWarning { message: String },
    /// Final view. Sent once, after the active job record is cleared.
    Terminal { snapshot: StatusSnapshot },
}

impl SessionUpdate {
    pub fn name(&self) -> &'static str {
        match self {
            SessionUpdate::Snapshot { .. } => "snapshot",
            SessionUpdate::ConnectionState { .. } => "connection_state",
            SessionUpdate::TransportWarning { .. } => "transport_warning",
            SessionUpdate::Terminal { .. } => "terminal",
        }
    }
}

/// Effects executed against the adapters
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    OpenChannel { job_id: JobId, conn: ConnectionId },
    CloseChannel { conn: ConnectionId },
    FetchStatus { job_id: JobId },
    Notify { update: SessionUpdate },
}

impl Effect {
    pub fn name(&self) -> &'static str {
        match self {
            Effect::OpenChannel { .. } => "open_channel",
            Effect::CloseChannel { .. } => "close_channel",
            Effect::FetchStatus { .. } => "fetch_status",
            Effect::Notify { .. } => "notify",
        }
    }

    pub fn fields(&self) -> Vec<(&'static str, String)> {
        match self {
            Effect::OpenChannel { job_id, conn } => {
                vec![("job_id", job_id.to_string()), ("conn", conn.to_string())]
            }
            Effect::CloseChannel { conn } => vec![("conn", conn.to_string())],
            Effect::FetchStatus { job_id } => vec![("job_id", job_id.to_string())],
            Effect::Notify { update } => {
                let mut fields = vec![("update", update.name().to_string())];
                match update {
                    SessionUpdate::Snapshot { snapshot } | SessionUpdate::Terminal { snapshot } => {
                        fields.push(("status", snapshot.status.to_string()));
                        fields.push(("progress", snapshot.progress_percent.to_string()));
                    }
                    SessionUpdate::ConnectionState { state } => {
                        fields.push(("state", state.to_string()));
                    }
                    SessionUpdate::TransportWarning { message } => {
                        fields.push(("message", message.clone()));
                    }
                }
                fields
            }
        }
    }

    pub fn verbose(&self) -> bool {
        match self {
            // Show less information for very frequent effects
            Effect::FetchStatus { .. } => false,
            Effect::Notify { update: SessionUpdate::Snapshot { .. } } => false,
            // Maintain full information for channel lifecycle and state changes
            _ => true,
        }
    }
}

#[cfg(test)]
#[path = "effect_tests.rs"]
mod tests;
