// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

pub mod abandon;
pub mod check;
pub mod status;
pub mod watch;

use crate::exit_error::ExitError;
use crate::output::OutputFormat;
use folio_adapters::{Endpoint, FileStore, HttpStatusClient, WsLiveChannel};
use folio_core::SystemClock;
use folio_engine::{EngineConfig, JobCoordinator, JobPersistence, SessionDeps};

pub type LiveCoordinator = JobCoordinator<HttpStatusClient, WsLiveChannel, FileStore, SystemClock>;

/// Resolved settings shared by every command.
pub struct Context {
    pub config: EngineConfig,
    pub format: OutputFormat,
}

impl Context {
    pub fn new(config: EngineConfig, format: OutputFormat) -> Self {
        Self { config, format }
    }

    fn endpoint(&self) -> Result<Endpoint, ExitError> {
        self.config.endpoint().map_err(|e| ExitError::usage(e.to_string()))
    }

    pub fn status_client(&self) -> Result<HttpStatusClient, ExitError> {
        Ok(HttpStatusClient::new(self.endpoint()?, self.config.request_timeout))
    }

    pub fn persistence(&self) -> JobPersistence<FileStore> {
        JobPersistence::new(FileStore::new(self.config.store_path()))
    }

    pub fn coordinator(&self) -> Result<LiveCoordinator, ExitError> {
        let endpoint = self.endpoint()?;
        let deps = SessionDeps {
            status: HttpStatusClient::new(endpoint.clone(), self.config.request_timeout),
            channel: WsLiveChannel::new(endpoint, self.config.request_timeout),
            persistence: self.persistence(),
        };
        Ok(JobCoordinator::new(deps, self.config.poll_interval, SystemClock))
    }
}
