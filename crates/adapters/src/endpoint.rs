// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Backend base URL, shared by the HTTP and WebSocket transports.

use folio_core::JobId;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EndpointError {
    #[error("invalid server URL {url:?}: {reason}")]
    Invalid { url: String, reason: String },
    #[error("unsupported scheme in {0:?} (only http:// is supported)")]
    UnsupportedScheme(String),
    #[error("missing host in {0:?}")]
    MissingHost(String),
    #[error("invalid port in {0:?}")]
    InvalidPort(String),
    #[error("server URL {0:?} must not include credentials, a query or a fragment")]
    ExtraComponents(String),
    #[error("job id {0:?} cannot be used as a path segment")]
    InvalidJobId(String),
}

/// Parsed `http://host[:port][/base]` server address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    base: Url,
}

impl Endpoint {
    pub fn parse(url: &str) -> Result<Self, EndpointError> {
        let base = Url::parse(url.trim()).map_err(|e| match e {
            url::ParseError::EmptyHost => EndpointError::MissingHost(url.to_string()),
            url::ParseError::InvalidPort => EndpointError::InvalidPort(url.to_string()),
            url::ParseError::RelativeUrlWithoutBase => {
                EndpointError::UnsupportedScheme(url.to_string())
            }
            e => EndpointError::Invalid { url: url.to_string(), reason: e.to_string() },
        })?;

        // Plain TCP and ws:// only; no TLS stack behind either transport
        if base.scheme() != "http" {
            return Err(EndpointError::UnsupportedScheme(url.to_string()));
        }
        if base.host_str().map_or(true, str::is_empty) {
            return Err(EndpointError::MissingHost(url.to_string()));
        }
        if !base.username().is_empty()
            || base.password().is_some()
            || base.query().is_some()
            || base.fragment().is_some()
        {
            return Err(EndpointError::ExtraComponents(url.to_string()));
        }
        Ok(Self { base })
    }

    /// `host:port`, suitable for `TcpStream::connect`. IPv6 hosts keep
    /// their brackets.
    pub fn authority(&self) -> String {
        let host = self.base.host_str().unwrap_or_default();
        let port = self.base.port_or_known_default().unwrap_or(80);
        format!("{host}:{port}")
    }

    /// `GET /status/{job_id}` target on this server.
    pub fn status_url(&self, job_id: &JobId) -> Result<Url, EndpointError> {
        self.job_url("status", job_id)
    }

    /// `ws://` URL of the live channel for `job_id` on this server.
    pub fn ws_url(&self, job_id: &JobId) -> Result<Url, EndpointError> {
        let mut url = self.job_url("ws", job_id)?;
        url.set_scheme("ws")
            .map_err(|()| EndpointError::UnsupportedScheme(self.base.to_string()))?;
        Ok(url)
    }

    /// `{base}/{route}/{job_id}` with the id percent-encoded as one segment.
    fn job_url(&self, route: &str, job_id: &JobId) -> Result<Url, EndpointError> {
        let id = job_id.as_str();
        // Dot segments would be dropped or resolved instead of encoded
        if matches!(id, "" | "." | "..") {
            return Err(EndpointError::InvalidJobId(id.to_string()));
        }
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| EndpointError::Invalid {
                url: self.base.to_string(),
                reason: "cannot be a base".to_string(),
            })?
            .pop_if_empty()
            .push(route)
            .push(id);
        Ok(url)
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.base.as_str().trim_end_matches('/'))
    }
}

#[cfg(test)]
#[path = "endpoint_tests.rs"]
mod tests;
