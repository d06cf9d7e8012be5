// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{JobHandle, JobStatusKind, LogEntry, LogLevel, StatusSnapshot};

// ── Proptest strategies ─────────────────────────────────────────────────

/// Proptest strategies for snapshot sequences.
pub mod strategies {
    use crate::{JobStatusKind, LogEntry, LogLevel, StatusSnapshot};
    use proptest::prelude::*;

    pub fn arb_status() -> impl Strategy<Value = JobStatusKind> {
        prop_oneof![
            4 => Just(JobStatusKind::Processing),
            2 => Just(JobStatusKind::Queued),
            1 => Just(JobStatusKind::Completed),
            1 => Just(JobStatusKind::Failed),
        ]
    }

    pub fn arb_log_entry() -> impl Strategy<Value = LogEntry> {
        (0u32..6, 0u32..3).prop_map(|(minute, msg)| {
            LogEntry::new(format!("10:{minute:02}:00"), LogLevel::Info, format!("step {msg}"))
        })
    }

    pub fn arb_snapshot() -> impl Strategy<Value = StatusSnapshot> {
        (arb_status(), 0u8..=100, proptest::collection::vec(arb_log_entry(), 0..4)).prop_map(
            |(status, progress, logs)| {
                StatusSnapshot::builder()
                    .status(status)
                    .progress_percent(progress)
                    .logs(logs)
                    .build()
            },
        )
    }

    /// Sequences of snapshots in arbitrary order, as two racing transports
    /// might deliver them.
    pub fn arb_snapshot_sequence() -> impl Strategy<Value = Vec<StatusSnapshot>> {
        proptest::collection::vec(arb_snapshot(), 1..40)
    }
}

// ── Snapshot factory functions ──────────────────────────────────────────

pub fn handle(job_id: &str) -> JobHandle {
    JobHandle::new(job_id, format!("book-{job_id}"))
}

pub fn processing(progress: u8) -> StatusSnapshot {
    StatusSnapshot::builder().status(JobStatusKind::Processing).progress_percent(progress).build()
}

pub fn queued() -> StatusSnapshot {
    StatusSnapshot::builder().status(JobStatusKind::Queued).build()
}

pub fn completed() -> StatusSnapshot {
    StatusSnapshot::builder()
        .status(JobStatusKind::Completed)
        .progress_percent(100)
        .word_count(90_000u64)
        .build()
}

pub fn failed(progress: u8, phase: &str, message: &str) -> StatusSnapshot {
    StatusSnapshot::builder()
        .status(JobStatusKind::Failed)
        .progress_percent(progress)
        .errors(vec![crate::PhaseError::new(phase, message)])
        .build()
}

pub fn log(timestamp: &str, message: &str) -> LogEntry {
    LogEntry::new(timestamp, LogLevel::Info, message)
}
