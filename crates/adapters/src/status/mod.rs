// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One-shot status fetch (`GET /status/{job_id}`).

mod http;

use crate::endpoint::{Endpoint, EndpointError};
use async_trait::async_trait;
use folio_core::{JobId, StatusSnapshot};
use std::time::Duration;
use thiserror::Error;

/// Errors from a status request
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StatusError {
    #[error("job not found")]
    NotFound,
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("malformed status payload: {0}")]
    Decode(String),
    #[error(transparent)]
    Endpoint(#[from] EndpointError),
}

/// Adapter for fetching the authoritative status of a job
#[async_trait]
pub trait StatusClient: Clone + Send + Sync + 'static {
    async fn fetch(&self, job_id: &JobId) -> Result<StatusSnapshot, StatusError>;
}

/// Status client speaking HTTP/1.1 over plain TCP.
#[derive(Clone, Debug)]
pub struct HttpStatusClient {
    endpoint: Endpoint,
    timeout: Duration,
}

impl HttpStatusClient {
    pub fn new(endpoint: Endpoint, timeout: Duration) -> Self {
        Self { endpoint, timeout }
    }
}

#[async_trait]
impl StatusClient for HttpStatusClient {
    async fn fetch(&self, job_id: &JobId) -> Result<StatusSnapshot, StatusError> {
        let url = self.endpoint.status_url(job_id)?;
        let response = http::get(&url, self.timeout).await?;
        match response.status {
            200..=299 => StatusSnapshot::from_json(&response.body)
                .map_err(|e| StatusError::Decode(e.to_string())),
            404 => Err(StatusError::NotFound),
            status => Err(StatusError::Http { status, body: response.body.trim().to_string() }),
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{StatusClient, StatusError};
    use async_trait::async_trait;
    use folio_core::{JobId, StatusSnapshot};
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::sync::Arc;

    #[derive(Default)]
    struct FakeStatusState {
        scripted: VecDeque<Result<StatusSnapshot, StatusError>>,
        fallback: Option<Result<StatusSnapshot, StatusError>>,
        calls: Vec<JobId>,
    }

    /// Fake status client returning scripted responses in order
    #[derive(Clone, Default)]
    pub struct FakeStatusClient {
        inner: Arc<Mutex<FakeStatusState>>,
    }

    impl FakeStatusClient {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue a response for the next fetch
        pub fn push(&self, response: Result<StatusSnapshot, StatusError>) {
            self.inner.lock().scripted.push_back(response);
        }

        /// Response returned once the scripted queue is exhausted
        pub fn set_fallback(&self, response: Result<StatusSnapshot, StatusError>) {
            self.inner.lock().fallback = Some(response);
        }

        /// Job ids of every fetch issued so far
        pub fn calls(&self) -> Vec<JobId> {
            self.inner.lock().calls.clone()
        }
    }

    #[async_trait]
    impl StatusClient for FakeStatusClient {
        async fn fetch(&self, job_id: &JobId) -> Result<StatusSnapshot, StatusError> {
            let mut inner = self.inner.lock();
            inner.calls.push(job_id.clone());
            match inner.scripted.pop_front() {
                Some(response) => response,
                None => inner
                    .fallback
                    .clone()
                    .unwrap_or_else(|| Err(StatusError::Transport("no scripted response".into()))),
            }
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeStatusClient;

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
