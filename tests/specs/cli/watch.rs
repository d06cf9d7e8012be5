// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `folio watch` resumes the remembered job or starts on a new one.

use crate::prelude::*;

#[test]
fn nothing_to_resume() {
    cli().args(&["watch"]).passes().stdout_has("no active job");
}

#[test]
fn stale_job_is_reported_and_not_watched() {
    let outcome = cli()
        .remembering("J1", "B1")
        .args(&["watch"])
        .passes()
        .stdout_has("discarded job J1 (book B1)");

    assert!(!outcome.record_exists());
}

#[test]
fn job_without_book_is_a_usage_error() {
    cli().args(&["watch", "--job", "J2"]).fails_with(2);
}
