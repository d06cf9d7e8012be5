// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job handle and status enumerations.

use crate::id::{BookId, JobId};
use serde::{Deserialize, Serialize};

/// Identifies one observable job.
///
/// Created when a job is submitted, persisted immediately, and cleared once
/// the job reaches a terminal state or the user abandons it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobHandle {
    pub job_id: JobId,
    pub book_id: BookId,
}

impl JobHandle {
    pub fn new(job_id: impl Into<JobId>, book_id: impl Into<BookId>) -> Self {
        Self { job_id: job_id.into(), book_id: book_id.into() }
    }
}

impl std::fmt::Display for JobHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (book {})", self.job_id, self.book_id)
    }
}

/// Overall status of a job.
///
/// `Completed` and `Failed` are terminal: once observed, no further
/// transitions are accepted for the same handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatusKind {
    Queued,
    Processing,
    Completed,
    Failed,
}

impl JobStatusKind {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatusKind::Completed | JobStatusKind::Failed)
    }

    /// Position in the forward lifecycle. Terminal states share the top rank.
    pub fn rank(&self) -> u8 {
        match self {
            JobStatusKind::Queued => 0,
            JobStatusKind::Processing => 1,
            JobStatusKind::Completed | JobStatusKind::Failed => 2,
        }
    }
}

crate::simple_display! {
    JobStatusKind {
        Queued => "queued",
        Processing => "processing",
        Completed => "completed",
        Failed => "failed",
    }
}

/// Status of one named phase (or chapter) within a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseStatusKind {
    Pending,
    Running,
    Completed,
    Error,
}

crate::simple_display! {
    PhaseStatusKind {
        Pending => "pending",
        Running => "running",
        Completed => "completed",
        Error => "error",
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
