// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Point-in-time view of a job.
//!
//! A `StatusSnapshot` is the single currency passed between the live
//! channel, the polling fallback and the reconciler. The serde layout
//! matches the backend's status payload, which is the same on both
//! transports.

use crate::id::JobId;
use crate::job::{JobStatusKind, PhaseStatusKind};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// Severity attached to a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
    #[serde(other)]
    Other,
}

crate::simple_display! {
    LogLevel {
        Info => "info",
        Success => "success",
        Warning => "warning",
        Error => "error",
        Other => "other",
    }
}

/// One entry of the job's activity log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Opaque, lexicographically ordered timestamp (the backend sends `HH:MM:SS`).
    pub timestamp: String,
    pub level: LogLevel,
    pub message: String,
}

impl LogEntry {
    pub fn new(timestamp: impl Into<String>, level: LogLevel, message: impl Into<String>) -> Self {
        Self { timestamp: timestamp.into(), level, message: message.into() }
    }
}

/// An error reported by one phase of the job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseError {
    pub phase: String,
    pub message: String,
}

impl PhaseError {
    pub fn new(phase: impl Into<String>, message: impl Into<String>) -> Self {
        Self { phase: phase.into(), message: message.into() }
    }
}

/// Immutable description of a job at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<JobId>,
    pub status: JobStatusKind,
    /// Overall progress, clamped to 0..=100 on decode.
    #[serde(rename = "progress", deserialize_with = "de_percent")]
    pub progress_percent: u8,
    #[serde(default)]
    pub current_phase: Option<String>,
    /// Per-phase status. Equality ignores insertion order.
    #[serde(default)]
    pub phase_status: IndexMap<String, PhaseStatusKind>,
    /// Per-chapter status keyed by the backend's chapter number.
    #[serde(default)]
    pub chapter_progress: IndexMap<String, PhaseStatusKind>,
    #[serde(default)]
    pub logs: Vec<LogEntry>,
    #[serde(default)]
    pub errors: Vec<PhaseError>,
    #[serde(default)]
    pub word_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

crate::builder! {
    pub struct StatusSnapshotBuilder => StatusSnapshot {
        set {
            status: JobStatusKind = JobStatusKind::Processing,
            progress_percent: u8 = 0,
            phase_status: IndexMap<String, PhaseStatusKind> = IndexMap::new(),
            chapter_progress: IndexMap<String, PhaseStatusKind> = IndexMap::new(),
            logs: Vec<LogEntry> = Vec::new(),
            errors: Vec<PhaseError> = Vec::new(),
        }
        option {
            job_id: JobId = None,
            current_phase: String = None,
            word_count: u64 = None,
            completed_at: String = None,
        }
    }
}

impl StatusSnapshot {
    /// Decode a snapshot from one JSON payload (a channel frame or an HTTP body).
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Count chapters by state.
    pub fn chapter_tally(&self) -> ChapterTally {
        let mut tally = ChapterTally::default();
        for status in self.chapter_progress.values() {
            match status {
                PhaseStatusKind::Pending => tally.pending += 1,
                PhaseStatusKind::Running => tally.running += 1,
                PhaseStatusKind::Completed => tally.completed += 1,
                PhaseStatusKind::Error => tally.error += 1,
            }
        }
        tally
    }
}

/// Chapter counts by state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChapterTally {
    pub completed: usize,
    pub running: usize,
    pub pending: usize,
    pub error: usize,
}

impl ChapterTally {
    pub fn total(&self) -> usize {
        self.completed + self.running + self.pending + self.error
    }
}

fn de_percent<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let raw = f64::deserialize(deserializer)?;
    Ok(raw.clamp(0.0, 100.0) as u8)
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
