// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn factory_methods_format() {
    let job = JobId::new("J1");
    assert_eq!(TimerId::reconnect(&job).as_str(), "reconnect:J1");
    assert_eq!(TimerId::poll(&job).as_str(), "poll:J1");
}

#[yare::parameterized(
    reconnect = { "reconnect:J1", Some(TimerKind::Reconnect { job_id: "J1" }) },
    poll      = { "poll:J1", Some(TimerKind::Poll { job_id: "J1" }) },
    colon_id  = { "poll:a:b", Some(TimerKind::Poll { job_id: "a:b" }) },
    unknown   = { "cron:J1", None },
    empty     = { "", None },
)]
fn parse_timer_kind(id: &str, expected: Option<TimerKind<'static>>) {
    assert_eq!(TimerKind::parse(id), expected);
}

#[test]
fn kind_round_trips_through_timer_id() {
    let id = TimerId::reconnect(&JobId::new("job-42"));
    let kind = id.kind().unwrap();
    assert_eq!(kind.to_timer_id(), id);
}
