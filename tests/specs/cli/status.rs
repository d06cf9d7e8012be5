// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `folio status <job>` performs one fetch.

use crate::prelude::*;

#[test]
fn unreachable_server_fails() {
    cli().args(&["status", "J1"]).fails_with(1).stderr_has("fetching status of job J1");
}

#[test]
fn job_id_is_required() {
    cli().args(&["status"]).fails_with(2);
}
