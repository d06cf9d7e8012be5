// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine configuration

use crate::env;
use folio_adapters::{Endpoint, EndpointError};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors resolving the engine configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid server URL: {0}")]
    ServerUrl(#[from] EndpointError),
    #[error("could not determine state directory (set FOLIO_STATE_DIR or HOME)")]
    NoStateDir,
}

/// Settings shared by the guard, the coordinator, and observation sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub server_url: String,
    pub state_dir: PathBuf,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
}

impl EngineConfig {
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        Self {
            server_url: env::DEFAULT_SERVER_URL.to_string(),
            state_dir: state_dir.into(),
            poll_interval: env::DEFAULT_POLL_INTERVAL,
            request_timeout: env::DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Load from `FOLIO_*` environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_in(None)
    }

    /// Like [`from_env`](Self::from_env), but an explicit state directory
    /// wins over `FOLIO_STATE_DIR`.
    pub fn from_env_in(state_dir: Option<PathBuf>) -> Result<Self, ConfigError> {
        let state_dir = state_dir.or_else(env::state_dir).ok_or(ConfigError::NoStateDir)?;
        Ok(Self::new(state_dir)
            .server_url(env::server_url())
            .poll_interval(env::poll_interval())
            .request_timeout(env::request_timeout()))
    }

    folio_core::setters! {
        into {
            server_url: String,
            state_dir: PathBuf,
        }
        set {
            poll_interval: Duration,
            request_timeout: Duration,
        }
    }

    pub fn endpoint(&self) -> Result<Endpoint, ConfigError> {
        Ok(Endpoint::parse(&self.server_url)?)
    }

    /// File holding the active job record
    pub fn store_path(&self) -> PathBuf {
        self.state_dir.join("active_job.json")
    }

    pub fn log_path(&self) -> PathBuf {
        self.state_dir.join("folio.log")
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
