// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable record of the job currently being observed.
//!
//! Written when a job is submitted and cleared when it reaches a terminal
//! state or is abandoned. Last writer wins.

use folio_adapters::{KeyValueStore, StoreError};
use folio_core::JobHandle;
use thiserror::Error;

pub const ACTIVE_JOB_KEY: &str = "active_job_id";
pub const ACTIVE_BOOK_KEY: &str = "active_book_id";

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("incomplete job record: {present} is set but {missing} is not")]
    Incomplete { present: &'static str, missing: &'static str },
}

#[derive(Clone)]
pub struct JobPersistence<K> {
    store: K,
}

impl<K: KeyValueStore> JobPersistence<K> {
    pub fn new(store: K) -> Self {
        Self { store }
    }

    pub fn save(&self, handle: &JobHandle) -> Result<(), PersistenceError> {
        self.store.set(ACTIVE_JOB_KEY, handle.job_id.as_str())?;
        self.store.set(ACTIVE_BOOK_KEY, handle.book_id.as_str())?;
        tracing::info!(job_id = %handle.job_id, book_id = %handle.book_id, "saved active job");
        Ok(())
    }

    /// `Ok(None)` when nothing is stored. A half-written record is an error.
    pub fn load(&self) -> Result<Option<JobHandle>, PersistenceError> {
        let job_id = self.store.get(ACTIVE_JOB_KEY)?.filter(|s| !s.is_empty());
        let book_id = self.store.get(ACTIVE_BOOK_KEY)?.filter(|s| !s.is_empty());
        match (job_id, book_id) {
            (Some(job_id), Some(book_id)) => Ok(Some(JobHandle::new(job_id, book_id))),
            (None, None) => Ok(None),
            (Some(_), None) => {
                Err(PersistenceError::Incomplete { present: ACTIVE_JOB_KEY, missing: ACTIVE_BOOK_KEY })
            }
            (None, Some(_)) => {
                Err(PersistenceError::Incomplete { present: ACTIVE_BOOK_KEY, missing: ACTIVE_JOB_KEY })
            }
        }
    }

    /// Remove both keys. Attempts both deletes even if the first fails.
    pub fn clear(&self) -> Result<(), PersistenceError> {
        let job = self.store.delete(ACTIVE_JOB_KEY);
        let book = self.store.delete(ACTIVE_BOOK_KEY);
        job?;
        book?;
        tracing::info!("cleared active job");
        Ok(())
    }
}

#[cfg(test)]
#[path = "persistence_tests.rs"]
mod tests;
