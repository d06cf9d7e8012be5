// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Inputs to an observation session

use folio_adapters::{ChannelEvent, StatusError};
use folio_core::{StatusSnapshot, TimerId};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Lifecycle or frame from a live channel
    Channel(ChannelEvent),
    /// Outcome of a one-shot status fetch
    PollResponse { result: Result<StatusSnapshot, StatusError> },
    /// A scheduler deadline passed
    Timer { id: TimerId },
}

impl Event {
    /// One-line description for logs
    pub fn log_summary(&self) -> String {
        match self {
            Event::Channel(ChannelEvent::Opened { conn }) => format!("channel:opened {conn}"),
            Event::Channel(ChannelEvent::Frame { conn, text }) => {
                format!("channel:frame {conn} bytes={}", text.len())
            }
            Event::Channel(ChannelEvent::Closed { conn, reason }) => match reason {
                Some(reason) => format!("channel:closed {conn} reason={reason}"),
                None => format!("channel:closed {conn}"),
            },
            Event::PollResponse { result: Ok(snapshot) } => format!(
                "poll:response status={} progress={}",
                snapshot.status, snapshot.progress_percent
            ),
            Event::PollResponse { result: Err(e) } => format!("poll:error {e}"),
            Event::Timer { id } => format!("timer {id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_adapters::ConnectionId;
    use folio_core::JobId;

    #[yare::parameterized(
        opened = { Event::Channel(ChannelEvent::Opened { conn: ConnectionId(1) }), "channel:opened conn-1" },
        closed = {
            Event::Channel(ChannelEvent::Closed { conn: ConnectionId(2), reason: Some("reset".into()) }),
            "channel:closed conn-2 reason=reset"
        },
        poll_error = { Event::PollResponse { result: Err(StatusError::NotFound) }, "poll:error job not found" },
        timer = { Event::Timer { id: TimerId::poll(&JobId::new("J1")) }, "timer poll:J1" },
    )]
    fn log_summary(event: Event, expected: &str) {
        assert_eq!(event.log_summary(), expected);
    }
}
