// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Helpers for running `folio` against an isolated state directory.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Nothing listens here, so every request fails fast with a refused connection.
pub const DEAD_SERVER: &str = "http://127.0.0.1:9";

pub struct Spec {
    cmd: Command,
    state: TempDir,
}

/// A `folio` invocation with its own empty state directory and no colors.
pub fn cli() -> Spec {
    let state = TempDir::new().unwrap();
    let mut cmd = Command::cargo_bin("folio").unwrap();
    cmd.env("FOLIO_STATE_DIR", state.path())
        .env("FOLIO_SERVER_URL", DEAD_SERVER)
        .env("FOLIO_REQUEST_TIMEOUT_MS", "2000")
        .env("NO_COLOR", "1")
        .env_remove("FOLIO_LOG");
    Spec { cmd, state }
}

impl Spec {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    /// Pretend a previous run left `job_id`/`book_id` as the active job.
    pub fn remembering(self, job_id: &str, book_id: &str) -> Self {
        let record = serde_json::json!({ "active_job_id": job_id, "active_book_id": book_id });
        std::fs::write(self.record_path(), record.to_string()).unwrap();
        self
    }

    pub fn record_path(&self) -> PathBuf {
        self.state.path().join("active_job.json")
    }

    pub fn passes(self) -> Outcome {
        self.run(Some(0))
    }

    pub fn fails_with(self, code: i32) -> Outcome {
        self.run(Some(code))
    }

    fn run(mut self, code: Option<i32>) -> Outcome {
        let output = self.cmd.output().unwrap();
        let outcome = Outcome {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            state: self.state,
        };
        assert_eq!(
            output.status.code(),
            code,
            "unexpected exit status\nstdout:\n{}\nstderr:\n{}",
            outcome.stdout,
            outcome.stderr
        );
        outcome
    }
}

pub struct Outcome {
    stdout: String,
    stderr: String,
    state: TempDir,
}

impl Outcome {
    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(self.stdout.contains(needle), "stdout missing {needle:?}:\n{}", self.stdout);
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(self.stderr.contains(needle), "stderr missing {needle:?}:\n{}", self.stderr);
        self
    }

    pub fn stdout_json(&self) -> serde_json::Value {
        serde_json::from_str(self.stdout.trim()).unwrap()
    }

    pub fn state_dir(&self) -> &Path {
        self.state.path()
    }

    pub fn record_exists(&self) -> bool {
        self.state_dir().join("active_job.json").exists()
    }
}
