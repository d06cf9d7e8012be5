// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Diagnostic logging to `{state_dir}/folio.log`, keeping stdout for output.

use folio_engine::{env, EngineConfig};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. The returned guard flushes the log file
/// when dropped; `None` means logging is disabled for this run.
pub fn init(config: &EngineConfig) -> Option<WorkerGuard> {
    let path = config.log_path();
    let (Some(dir), Some(file)) = (path.parent(), path.file_name()) else {
        return None;
    };
    let appender = match RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file.to_string_lossy())
        .build(dir)
    {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!("warning: cannot open log file {}: {e}", path.display());
            return None;
        }
    };

    let filter = EnvFilter::try_new(env::log_filter()).unwrap_or_else(|_| EnvFilter::new("info"));
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()?;
    Some(guard)
}
