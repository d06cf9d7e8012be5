// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error carrying the process exit code.
//!
//! Commands return `ExitError` instead of calling `std::process::exit()`,
//! leaving process termination to `main()`.

use std::fmt;

/// The watched job ended in `failed`, or the requested job does not exist.
pub const JOB_FAILED: i32 = 1;
/// Bad flags, bad configuration, or a conflicting in-flight job.
pub const USAGE: i32 = 2;

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    pub fn job_failed(message: impl Into<String>) -> Self {
        Self::new(JOB_FAILED, message)
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(USAGE, message)
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ExitError {}
