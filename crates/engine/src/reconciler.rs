// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single authority for folding status snapshots into one view.
//!
//! Snapshots arrive from the live channel and from polling in any order.
//! Progress never goes backwards, the terminal snapshot is surfaced exactly
//! once, and the persisted job record is cleared before anyone hears about it.

use crate::persistence::JobPersistence;
use folio_adapters::KeyValueStore;
use folio_core::{JobStatusKind, LogEntry, PhaseError, StatusSnapshot};
use std::collections::HashSet;

/// Most recent log entries kept in the merged view
pub const MAX_LOG_ENTRIES: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    ProgressRegression { last: u8, received: u8 },
    StatusRegression { last: JobStatusKind, received: JobStatusKind },
    AfterTerminal,
}

impl std::fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IgnoreReason::ProgressRegression { last, received } => {
                write!(f, "progress regression ({received}% < {last}%)")
            }
            IgnoreReason::StatusRegression { last, received } => {
                write!(f, "status regression ({last} -> {received})")
            }
            IgnoreReason::AfterTerminal => f.write_str("after terminal"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReconcileResult {
    Updated,
    Ignored(IgnoreReason),
    Terminal(StatusSnapshot),
}

pub struct StatusReconciler<K> {
    persistence: JobPersistence<K>,
    view: Option<StatusSnapshot>,
    terminal: bool,
    /// Bumped whenever the view changes, including log merges from ignored snapshots
    revision: u64,
}

impl<K: KeyValueStore> StatusReconciler<K> {
    pub fn new(persistence: JobPersistence<K>) -> Self {
        Self { persistence, view: None, terminal: false, revision: 0 }
    }

    pub fn view(&self) -> Option<&StatusSnapshot> {
        self.view.as_ref()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    pub fn apply(&mut self, snapshot: StatusSnapshot) -> ReconcileResult {
        if self.terminal {
            return ReconcileResult::Ignored(IgnoreReason::AfterTerminal);
        }

        let Some(current) = self.view.take() else {
            return self.accept(None, snapshot);
        };

        if snapshot.is_terminal() {
            return self.accept(Some(current), snapshot);
        }

        let regression = if snapshot.progress_percent < current.progress_percent {
            Some(IgnoreReason::ProgressRegression {
                last: current.progress_percent,
                received: snapshot.progress_percent,
            })
        } else if snapshot.status.rank() < current.status.rank() {
            Some(IgnoreReason::StatusRegression { last: current.status, received: snapshot.status })
        } else {
            None
        };

        match regression {
            Some(reason) => {
                let mut view = current;
                if merge_history(&mut view, &snapshot.logs, &snapshot.errors) {
                    self.revision += 1;
                }
                self.view = Some(view);
                ReconcileResult::Ignored(reason)
            }
            None => self.accept(Some(current), snapshot),
        }
    }

    fn accept(&mut self, previous: Option<StatusSnapshot>, mut snapshot: StatusSnapshot) -> ReconcileResult {
        if let Some(previous) = previous {
            snapshot.progress_percent = snapshot.progress_percent.max(previous.progress_percent);
            let mut logs = previous.logs;
            let mut errors = previous.errors;
            merge_logs(&mut logs, &snapshot.logs);
            merge_errors(&mut errors, &snapshot.errors);
            snapshot.logs = logs;
            snapshot.errors = errors;
        } else {
            let incoming_logs = std::mem::take(&mut snapshot.logs);
            let incoming_errors = std::mem::take(&mut snapshot.errors);
            merge_logs(&mut snapshot.logs, &incoming_logs);
            merge_errors(&mut snapshot.errors, &incoming_errors);
        }
        self.revision += 1;

        if snapshot.is_terminal() {
            self.terminal = true;
            if let Err(e) = self.persistence.clear() {
                tracing::warn!(error = %e, "failed to clear active job record");
            }
            self.view = Some(snapshot.clone());
            return ReconcileResult::Terminal(snapshot);
        }

        self.view = Some(snapshot);
        ReconcileResult::Updated
    }
}

/// Merge logs and errors into `view`. Returns whether anything was added.
fn merge_history(view: &mut StatusSnapshot, logs: &[LogEntry], errors: &[PhaseError]) -> bool {
    let before = (view.logs.clone(), view.errors.len());
    merge_logs(&mut view.logs, logs);
    merge_errors(&mut view.errors, errors);
    view.logs != before.0 || view.errors.len() != before.1
}

/// Append entries not yet in `into`, keeping the most recent
/// [`MAX_LOG_ENTRIES`].
///
/// Timestamps carry no date, so they are never compared. The backend log is
/// append-only: entries that precede one already held were seen before
/// (possibly evicted by the cap) and are skipped, unless nothing in the
/// batch is held yet.
fn merge_logs(into: &mut Vec<LogEntry>, incoming: &[LogEntry]) {
    let key = |e: &LogEntry| (e.timestamp.clone(), e.message.clone());
    let mut seen: HashSet<(String, String)> = into.iter().map(key).collect();
    let start = incoming.iter().rposition(|e| seen.contains(&key(e))).map_or(0, |i| i + 1);
    for entry in &incoming[start..] {
        if seen.insert(key(entry)) {
            into.push(entry.clone());
        }
    }
    if into.len() > MAX_LOG_ENTRIES {
        into.drain(..into.len() - MAX_LOG_ENTRIES);
    }
}

fn merge_errors(into: &mut Vec<PhaseError>, incoming: &[PhaseError]) {
    for error in incoming {
        if !into.iter().any(|e| e.phase == error.phase && e.message == error.message) {
            into.push(error.clone());
        }
    }
}

#[cfg(test)]
#[path = "reconciler_tests.rs"]
mod tests;
