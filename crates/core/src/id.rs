// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Server-issued identifiers

crate::define_id! {
    /// Identifier of one processing job on the backend.
    ///
    /// Keys the one-shot status endpoint and the live-update channel.
    pub struct JobId;
}

crate::define_id! {
    /// Identifier of the book a job is producing.
    pub struct BookId;
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
