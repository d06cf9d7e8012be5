// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Help and usage output.

use crate::prelude::*;

#[test]
fn no_args_shows_usage_and_exits_zero() {
    cli().passes().stdout_has("Usage:");
}

#[test]
fn help_lists_commands() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("check")
        .stdout_has("watch")
        .stdout_has("status")
        .stdout_has("abandon");
}

#[test]
fn watch_help_shows_job_flags() {
    cli().args(&["watch", "--help"]).passes().stdout_has("--job").stdout_has("--book");
}

#[test]
fn version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("0.1");
}

#[test]
fn unknown_output_format_is_a_usage_error() {
    cli().args(&["check", "-o", "yaml"]).fails_with(2);
}
