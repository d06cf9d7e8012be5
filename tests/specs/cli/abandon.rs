// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `folio abandon` forgets the remembered job without asking the server.

use crate::prelude::*;

#[test]
fn abandon_clears_the_record() {
    let outcome =
        cli().remembering("J1", "B1").args(&["abandon"]).passes().stdout_has("abandoned job J1");

    assert!(!outcome.record_exists());
}

#[test]
fn abandon_without_record_is_a_no_op() {
    cli().args(&["abandon"]).passes().stdout_has("no active job");
}

#[test]
fn abandon_as_json_names_the_job() {
    let outcome = cli().remembering("J1", "B1").args(&["abandon", "-o", "json"]).passes();

    let value = outcome.stdout_json();
    assert_eq!(value["abandoned"]["job_id"], "J1");
    assert_eq!(value["abandoned"]["book_id"], "B1");
}
