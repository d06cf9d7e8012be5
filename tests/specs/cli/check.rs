// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `folio check` decides what to do with a remembered job.

use crate::prelude::*;

#[test]
fn empty_state_has_no_active_job() {
    cli().args(&["check"]).passes().stdout_has("no active job");
}

#[test]
fn empty_state_as_json() {
    let outcome = cli().args(&["check", "-o", "json"]).passes();

    assert_eq!(outcome.stdout_json()["decision"], "no_active_job");
}

#[test]
fn unreachable_job_is_discarded_and_forgotten() {
    let outcome = cli()
        .remembering("J1", "B1")
        .args(&["check"])
        .passes()
        .stdout_has("discarded job J1 (book B1)")
        .stdout_has("status unavailable");

    assert!(!outcome.record_exists());
}

#[test]
fn half_written_record_is_discarded() {
    let spec = cli().args(&["check", "-o", "json"]);
    std::fs::write(spec.record_path(), r#"{"active_job_id":"J1"}"#).unwrap();

    let outcome = spec.passes();

    assert_eq!(outcome.stdout_json()["decision"], "stale_job_discarded");
    assert!(outcome.stdout_json()["job"].is_null());
    assert!(!outcome.record_exists());
}

#[test]
fn invalid_server_url_is_a_usage_error() {
    cli()
        .remembering("J1", "B1")
        .args(&["check", "--server", "ftp://example.com"])
        .fails_with(2)
        .stderr_has("error:");
}
