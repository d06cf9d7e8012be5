// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use folio_adapters::{MemoryStore, StoreOp};
use folio_core::test_support::strategies::arb_snapshot_sequence;
use folio_core::test_support::{completed, failed, handle, log, processing, queued};
use proptest::prelude::*;

fn reconciler() -> (StatusReconciler<MemoryStore>, MemoryStore) {
    let store = MemoryStore::new();
    let persistence = JobPersistence::new(store.clone());
    persistence.save(&handle("J1")).unwrap();
    (StatusReconciler::new(persistence), store)
}

fn with_logs(mut snapshot: StatusSnapshot, logs: Vec<LogEntry>) -> StatusSnapshot {
    snapshot.logs = logs;
    snapshot
}

#[test]
fn first_snapshot_is_accepted() {
    let (mut r, _) = reconciler();
    assert_eq!(r.apply(queued()), ReconcileResult::Updated);
    assert_eq!(r.view().unwrap().status, JobStatusKind::Queued);
}

#[test]
fn equal_progress_is_accepted() {
    let (mut r, _) = reconciler();
    r.apply(processing(40));
    assert_eq!(r.apply(processing(40)), ReconcileResult::Updated);
}

#[test]
fn lower_progress_is_ignored() {
    let (mut r, _) = reconciler();
    r.apply(processing(60));

    assert_eq!(
        r.apply(processing(40)),
        ReconcileResult::Ignored(IgnoreReason::ProgressRegression { last: 60, received: 40 })
    );
    assert_eq!(r.view().unwrap().progress_percent, 60);
}

#[test]
fn regressed_snapshot_still_contributes_logs() {
    let (mut r, _) = reconciler();
    r.apply(with_logs(processing(60), vec![log("10:00:05", "chapter 3 done")]));
    let revision = r.revision();

    let result = r.apply(with_logs(processing(40), vec![log("10:00:01", "started")]));

    assert!(matches!(result, ReconcileResult::Ignored(IgnoreReason::ProgressRegression { .. })));
    let messages: Vec<_> = r.view().unwrap().logs.iter().map(|l| l.message.as_str()).collect();
    assert_eq!(messages, vec!["chapter 3 done", "started"]);
    assert!(r.revision() > revision);
}

#[test]
fn regressed_snapshot_without_new_history_does_not_bump_revision() {
    let (mut r, _) = reconciler();
    r.apply(with_logs(processing(60), vec![log("10:00:05", "x")]));
    let revision = r.revision();

    r.apply(with_logs(processing(40), vec![log("10:00:05", "x")]));

    assert_eq!(r.revision(), revision);
}

#[test]
fn status_moving_back_to_queued_is_ignored() {
    let (mut r, _) = reconciler();
    r.apply(processing(0));

    assert_eq!(
        r.apply(queued()),
        ReconcileResult::Ignored(IgnoreReason::StatusRegression {
            last: JobStatusKind::Processing,
            received: JobStatusKind::Queued,
        })
    );
}

#[test]
fn logs_are_deduplicated_in_arrival_order() {
    let (mut r, _) = reconciler();
    r.apply(with_logs(processing(10), vec![log("10:00:01", "a"), log("10:00:02", "b")]));
    r.apply(with_logs(processing(20), vec![log("10:00:02", "b"), log("10:00:03", "c")]));

    let logs: Vec<_> =
        r.view().unwrap().logs.iter().map(|l| (l.timestamp.as_str(), l.message.as_str())).collect();
    assert_eq!(logs, vec![("10:00:01", "a"), ("10:00:02", "b"), ("10:00:03", "c")]);
}

#[test]
fn logs_after_midnight_are_kept_newest_last() {
    let (mut r, _) = reconciler();
    let before: Vec<_> = (0..100).map(|i| log(&format!("23:58:{:02}", i % 60), &format!("m{i}"))).collect();
    r.apply(with_logs(processing(10), before.clone()));

    let mut after = before;
    after.push(log("00:00:01", "after midnight"));
    r.apply(with_logs(processing(20), after));

    let logs = &r.view().unwrap().logs;
    assert_eq!(logs.len(), MAX_LOG_ENTRIES);
    assert_eq!(logs.last().unwrap().message, "after midnight");
    assert_eq!(logs[0].message, "m1");
}

#[test]
fn entries_evicted_by_the_cap_are_not_readded() {
    let (mut r, _) = reconciler();
    let logs: Vec<_> = (0..150).map(|i| log(&format!("10:{:02}:{:02}", i / 60, i % 60), "tick")).collect();
    r.apply(with_logs(processing(10), logs.clone()));
    r.apply(with_logs(processing(20), logs));

    let view = r.view().unwrap();
    assert_eq!(view.logs.len(), MAX_LOG_ENTRIES);
    assert_eq!(view.logs[0].timestamp, "10:00:50");
    assert_eq!(view.logs.last().unwrap().timestamp, "10:02:29");
}

#[test]
fn log_history_is_capped() {
    let (mut r, _) = reconciler();
    let logs: Vec<_> = (0..150).map(|i| log(&format!("10:{:02}:{:02}", i / 60, i % 60), "tick")).collect();
    r.apply(with_logs(processing(10), logs));

    let view = r.view().unwrap();
    assert_eq!(view.logs.len(), MAX_LOG_ENTRIES);
    assert_eq!(view.logs[0].timestamp, "10:00:50");
}

#[test]
fn errors_are_deduplicated_by_phase_and_message() {
    let (mut r, _) = reconciler();
    let mut first = processing(10);
    first.errors = vec![PhaseError::new("Analysis", "timeout")];
    let mut second = processing(20);
    second.errors =
        vec![PhaseError::new("Analysis", "timeout"), PhaseError::new("Editing", "timeout")];

    r.apply(first);
    r.apply(second);

    assert_eq!(r.view().unwrap().errors.len(), 2);
}

#[test]
fn terminal_is_reported_once_and_clears_persistence() {
    let (mut r, store) = reconciler();
    r.apply(processing(90));

    let result = r.apply(completed());

    assert!(matches!(result, ReconcileResult::Terminal(ref s) if s.status == JobStatusKind::Completed));
    assert!(r.is_terminal());
    assert!(store.ops().contains(&StoreOp::Delete("active_job_id".into())));
    assert!(store.snapshot().is_empty());
    assert_eq!(r.apply(completed()), ReconcileResult::Ignored(IgnoreReason::AfterTerminal));
    assert_eq!(r.apply(processing(100)), ReconcileResult::Ignored(IgnoreReason::AfterTerminal));
}

#[test]
fn terminal_with_lower_progress_keeps_observed_progress() {
    let (mut r, _) = reconciler();
    r.apply(processing(70));

    let ReconcileResult::Terminal(view) = r.apply(failed(40, "Editing", "model error")) else {
        panic!("expected terminal");
    };

    assert_eq!(view.status, JobStatusKind::Failed);
    assert_eq!(view.progress_percent, 70);
    assert_eq!(view.errors, vec![PhaseError::new("Editing", "model error")]);
}

#[test]
fn terminal_as_first_snapshot() {
    let (mut r, store) = reconciler();
    assert!(matches!(r.apply(completed()), ReconcileResult::Terminal(_)));
    assert!(store.snapshot().is_empty());
}

proptest! {
    #[test]
    fn observed_progress_never_decreases(sequence in arb_snapshot_sequence()) {
        let (mut r, _) = reconciler();
        let mut last = 0u8;
        for snapshot in sequence {
            r.apply(snapshot);
            let progress = r.view().map(|v| v.progress_percent).unwrap_or(0);
            prop_assert!(progress >= last, "progress went from {} to {}", last, progress);
            last = progress;
        }
    }

    #[test]
    fn terminal_surfaces_exactly_once(sequence in arb_snapshot_sequence()) {
        let (mut r, _) = reconciler();
        let any_terminal = sequence.iter().any(|s| s.is_terminal());
        let mut terminals = 0;
        for snapshot in sequence {
            match r.apply(snapshot) {
                ReconcileResult::Terminal(_) => terminals += 1,
                ReconcileResult::Ignored(IgnoreReason::AfterTerminal) => {
                    prop_assert_eq!(terminals, 1);
                }
                _ => {
                    prop_assert_eq!(terminals, 0);
                }
            }
        }
        prop_assert_eq!(terminals, usize::from(any_terminal));
    }
}
