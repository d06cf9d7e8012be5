// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Arbitration between a remembered job and a new submission.
//!
//! New jobs may only begin once the remembered one has been resolved, and
//! only one session is observed at a time.

use crate::effect::SessionUpdate;
use crate::guard::{ActiveJobGuard, Decision};
use crate::persistence::{JobPersistence, PersistenceError};
use crate::runtime::{observe, SessionDeps, SessionHandle};
use folio_adapters::{KeyValueStore, LiveChannel, StatusClient};
use folio_core::{Clock, JobHandle, JobId};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("the remembered job has not been resolved yet")]
    GateClosed,
    #[error("job {job_id} is still being observed")]
    SessionActive { job_id: JobId },
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

pub struct JobCoordinator<S, L, K, C> {
    deps: SessionDeps<S, L, K>,
    poll_interval: Duration,
    clock: C,
    gate_open: bool,
    session: Option<SessionHandle>,
}

impl<S, L, K, C> JobCoordinator<S, L, K, C>
where
    S: StatusClient,
    L: LiveChannel,
    K: KeyValueStore,
    C: Clock,
{
    pub fn new(deps: SessionDeps<S, L, K>, poll_interval: Duration, clock: C) -> Self {
        Self { deps, poll_interval, clock, gate_open: false, session: None }
    }

    pub fn is_gate_open(&self) -> bool {
        self.gate_open
    }

    pub fn persistence(&self) -> &JobPersistence<K> {
        &self.deps.persistence
    }

    pub fn session(&self) -> Option<&SessionHandle> {
        self.session.as_ref().filter(|s| !s.is_finished())
    }

    /// Run the start-up guard and open the submission gate.
    pub async fn resolve(&mut self) -> Decision {
        let guard = ActiveJobGuard::new(self.deps.status.clone(), self.deps.persistence.clone());
        let decision = guard.resolve().await;
        self.gate_open = true;
        decision
    }

    /// Persist a freshly submitted job and start observing it.
    pub fn begin(
        &mut self,
        handle: JobHandle,
    ) -> Result<mpsc::Receiver<SessionUpdate>, CoordinatorError> {
        self.check_idle()?;
        self.deps.persistence.save(&handle)?;
        Ok(self.start_session(handle))
    }

    /// Observe a job the guard decided to resume.
    pub fn resume(
        &mut self,
        handle: JobHandle,
    ) -> Result<mpsc::Receiver<SessionUpdate>, CoordinatorError> {
        self.check_idle()?;
        Ok(self.start_session(handle))
    }

    /// Stop observing and forget the active job.
    pub async fn abandon(&mut self) -> Result<(), CoordinatorError> {
        if let Some(session) = self.session.take() {
            session.cancel();
            session.finished().await;
        }
        self.deps.persistence.clear()?;
        Ok(())
    }

    fn check_idle(&self) -> Result<(), CoordinatorError> {
        if !self.gate_open {
            return Err(CoordinatorError::GateClosed);
        }
        if let Some(session) = self.session() {
            return Err(CoordinatorError::SessionActive { job_id: session.job().job_id.clone() });
        }
        Ok(())
    }

    fn start_session(&mut self, handle: JobHandle) -> mpsc::Receiver<SessionUpdate> {
        let (session, updates) =
            observe(handle, self.deps.clone(), self.poll_interval, self.clock.clone());
        self.session = Some(session);
        updates
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
