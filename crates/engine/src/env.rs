// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the engine.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(3000);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(30_000);

/// Backend base URL (`FOLIO_SERVER_URL`)
pub fn server_url() -> String {
    std::env::var("FOLIO_SERVER_URL")
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string())
}

/// Resolve state directory: FOLIO_STATE_DIR > XDG_STATE_HOME/folio > ~/.local/state/folio
pub fn state_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("FOLIO_STATE_DIR") {
        if !dir.is_empty() {
            return Some(PathBuf::from(dir));
        }
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        if !xdg.is_empty() {
            return Some(PathBuf::from(xdg).join("folio"));
        }
    }
    dirs::home_dir().map(|home| home.join(".local/state/folio"))
}

/// Gap between status polls once the live channel is abandoned
pub fn poll_interval() -> Duration {
    duration_ms("FOLIO_POLL_INTERVAL_MS").unwrap_or(DEFAULT_POLL_INTERVAL)
}

/// Timeout for one-shot status requests and channel handshakes
pub fn request_timeout() -> Duration {
    duration_ms("FOLIO_REQUEST_TIMEOUT_MS").unwrap_or(DEFAULT_REQUEST_TIMEOUT)
}

/// Log filter directive (`FOLIO_LOG`), e.g. `info` or `folio_engine=debug`
pub fn log_filter() -> String {
    std::env::var("FOLIO_LOG").ok().filter(|s| !s.is_empty()).unwrap_or_else(|| "info".into())
}

fn duration_ms(var: &str) -> Option<Duration> {
    let raw = std::env::var(var).ok()?;
    match raw.trim().parse::<u64>() {
        Ok(0) | Err(_) => {
            tracing::warn!(var, value = %raw, "ignoring invalid duration, using default");
            None
        }
        Ok(ms) => Some(Duration::from_millis(ms)),
    }
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
