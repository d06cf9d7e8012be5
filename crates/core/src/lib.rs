// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! folio-core: value types shared by the folio job watcher

pub mod macros;

pub mod clock;
pub mod connection;
pub mod id;
pub mod job;
pub mod snapshot;
pub mod timer;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use clock::{Clock, FakeClock, SystemClock};
pub use connection::ConnectionState;
pub use id::{BookId, JobId};
pub use job::{JobHandle, JobStatusKind, PhaseStatusKind};
#[cfg(any(test, feature = "test-support"))]
pub use snapshot::StatusSnapshotBuilder;
pub use snapshot::{ChapterTally, LogEntry, LogLevel, PhaseError, StatusSnapshot};
pub use timer::{TimerId, TimerKind};
