// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Start-up validation of a remembered job.
//!
//! | Stored record | Server says            | Decision            | Record   |
//! |---------------|------------------------|---------------------|----------|
//! | none          | (not asked)            | `NoActiveJob`       | -        |
//! | unreadable    | (not asked)            | `StaleJobDiscarded` | cleared  |
//! | handle        | fetch error / 404      | `StaleJobDiscarded` | cleared  |
//! | handle        | queued / processing    | `ResumeJob`         | kept     |
//! | handle        | completed / failed     | `StaleJobDiscarded` | cleared  |

use crate::persistence::{JobPersistence, PersistenceError};
use folio_adapters::{KeyValueStore, StatusClient, StatusError};
use folio_core::{JobHandle, JobStatusKind};

/// Why a remembered job was dropped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaleReason {
    /// The stored record could not be read
    Unreadable(String),
    /// The status request failed or the server no longer knows the job
    Unreachable(StatusError),
    /// The job had already finished
    Finished(JobStatusKind),
}

impl std::fmt::Display for StaleReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StaleReason::Unreadable(e) => write!(f, "unreadable record: {e}"),
            StaleReason::Unreachable(e) => write!(f, "status unavailable: {e}"),
            StaleReason::Finished(status) => write!(f, "job already {status}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    NoActiveJob,
    ResumeJob(JobHandle),
    StaleJobDiscarded { job: Option<JobHandle>, reason: StaleReason },
}

pub struct ActiveJobGuard<S, K> {
    status: S,
    persistence: JobPersistence<K>,
}

impl<S, K> ActiveJobGuard<S, K>
where
    S: StatusClient,
    K: KeyValueStore,
{
    pub fn new(status: S, persistence: JobPersistence<K>) -> Self {
        Self { status, persistence }
    }

    /// Decide what to do with the remembered job. Never fails: anything that
    /// cannot be confirmed as in flight is discarded.
    pub async fn resolve(&self) -> Decision {
        let handle = match self.persistence.load() {
            Ok(None) => {
                tracing::debug!("no active job recorded");
                return Decision::NoActiveJob;
            }
            Ok(Some(handle)) => handle,
            Err(e) => {
                tracing::warn!(error = %e, "discarding unreadable job record");
                return self.discard(None, StaleReason::Unreadable(e.to_string()));
            }
        };

        match self.status.fetch(&handle.job_id).await {
            Err(e) => {
                tracing::info!(job = %handle, error = %e, "remembered job is not reachable");
                self.discard(Some(handle), StaleReason::Unreachable(e))
            }
            Ok(snapshot) if snapshot.is_terminal() => {
                tracing::info!(job = %handle, status = %snapshot.status, "remembered job already finished");
                self.discard(Some(handle), StaleReason::Finished(snapshot.status))
            }
            Ok(snapshot) => {
                tracing::info!(
                    job = %handle,
                    status = %snapshot.status,
                    progress = snapshot.progress_percent,
                    "resuming remembered job"
                );
                Decision::ResumeJob(handle)
            }
        }
    }

    /// Forget the remembered job (the user declined to resume it).
    pub fn abandon(&self) -> Result<(), PersistenceError> {
        self.persistence.clear()
    }

    fn discard(&self, job: Option<JobHandle>, reason: StaleReason) -> Decision {
        if let Err(e) = self.persistence.clear() {
            tracing::warn!(error = %e, "failed to clear stale job record");
        }
        Decision::StaleJobDiscarded { job, reason }
    }
}

#[cfg(test)]
#[path = "guard_tests.rs"]
mod tests;
