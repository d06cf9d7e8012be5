// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use folio_core::test_support::{completed, processing};
use folio_core::{Clock, FakeClock};

const INTERVAL: Duration = Duration::from_secs(3);

fn job() -> JobId {
    JobId::new("J1")
}

fn fetches(effects: &[Effect]) -> usize {
    effects.iter().filter(|e| matches!(e, Effect::FetchStatus { .. })).count()
}

/// Fire due timers into the fallback, returning the effects.
fn tick(polling: &mut PollingFallback, scheduler: &mut Scheduler, clock: &FakeClock) -> Vec<Effect> {
    let mut effects = Vec::new();
    for id in scheduler.fired_timers(clock.now()) {
        assert_eq!(id, TimerId::poll(&job()));
        polling.on_timer(&mut effects);
    }
    effects
}

#[test]
fn first_request_is_immediate() {
    let mut effects = Vec::new();
    let polling = PollingFallback::start(job(), INTERVAL, &mut effects);

    assert_eq!(effects, vec![Effect::FetchStatus { job_id: job() }]);
    assert!(polling.is_active());
}

#[test]
fn next_request_waits_for_interval_after_response() {
    let clock = FakeClock::new();
    let mut scheduler = Scheduler::new();
    let mut polling = PollingFallback::start(job(), INTERVAL, &mut Vec::new());

    polling.on_response(Ok(processing(10)), &mut scheduler, clock.now());

    clock.advance(Duration::from_secs(2));
    assert!(tick(&mut polling, &mut scheduler, &clock).is_empty());
    clock.advance(Duration::from_secs(1));
    assert_eq!(fetches(&tick(&mut polling, &mut scheduler, &clock)), 1);
}

#[test]
fn requests_never_overlap() {
    let mut scheduler = Scheduler::new();
    let clock = FakeClock::new();
    let mut polling = PollingFallback::start(job(), INTERVAL, &mut Vec::new());

    // A stray timer while the first request is outstanding
    let mut effects = Vec::new();
    polling.on_timer(&mut effects);
    assert!(effects.is_empty());
    assert!(!scheduler.has_timers());

    polling.on_response(Ok(processing(1)), &mut scheduler, clock.now());
    assert!(scheduler.has_timers());
}

#[test]
fn self_terminates_after_terminal_snapshot() {
    let clock = FakeClock::new();
    let mut scheduler = Scheduler::new();
    let mut effects = Vec::new();
    let mut polling = PollingFallback::start(job(), INTERVAL, &mut effects);
    let responses = [processing(30), processing(60), completed()];

    let mut surfaced = Vec::new();
    for response in responses {
        assert_eq!(fetches(&effects), 1, "exactly one request per round");
        surfaced.push(polling.on_response(Ok(response), &mut scheduler, clock.now()));
        clock.advance(INTERVAL);
        effects = tick(&mut polling, &mut scheduler, &clock);
    }

    assert_eq!(surfaced.len(), 3);
    assert!(surfaced.iter().all(|r| matches!(r, Some(Ok(_)))));
    assert!(effects.is_empty(), "no request after terminal");
    assert!(!polling.is_active());
    assert!(!scheduler.has_timers());

    clock.advance(INTERVAL * 10);
    assert!(tick(&mut polling, &mut scheduler, &clock).is_empty());
}

#[test]
fn errors_are_reported_and_loop_continues() {
    let clock = FakeClock::new();
    let mut scheduler = Scheduler::new();
    let mut polling = PollingFallback::start(job(), INTERVAL, &mut Vec::new());

    let surfaced = polling.on_response(
        Err(StatusError::Timeout(Duration::from_secs(30))),
        &mut scheduler,
        clock.now(),
    );

    assert!(matches!(surfaced, Some(Err(StatusError::Timeout(_)))));
    clock.advance(INTERVAL);
    assert_eq!(fetches(&tick(&mut polling, &mut scheduler, &clock)), 1);
}

#[test]
fn cancel_prevents_scheduled_request() {
    let clock = FakeClock::new();
    let mut scheduler = Scheduler::new();
    let mut polling = PollingFallback::start(job(), INTERVAL, &mut Vec::new());
    polling.on_response(Ok(processing(10)), &mut scheduler, clock.now());

    polling.cancel(&mut scheduler);

    assert!(!scheduler.has_timers());
    let mut effects = Vec::new();
    polling.on_timer(&mut effects);
    assert!(effects.is_empty());
    assert!(!polling.is_active());
}

#[test]
fn cancelling_via_token_stops_the_loop() {
    let clock = FakeClock::new();
    let mut scheduler = Scheduler::new();
    let mut polling = PollingFallback::start(job(), INTERVAL, &mut Vec::new());
    polling.on_response(Ok(processing(10)), &mut scheduler, clock.now());

    polling.token().cancel();

    clock.advance(INTERVAL);
    assert!(tick(&mut polling, &mut scheduler, &clock).is_empty());
}

#[test]
fn cancel_is_idempotent_and_safe_after_finish() {
    let clock = FakeClock::new();
    let mut scheduler = Scheduler::new();
    let mut polling = PollingFallback::start(job(), INTERVAL, &mut Vec::new());
    polling.on_response(Ok(completed()), &mut scheduler, clock.now());

    polling.cancel(&mut scheduler);
    polling.cancel(&mut scheduler);

    assert!(!polling.is_active());
}

#[test]
fn response_after_cancel_is_dropped() {
    let clock = FakeClock::new();
    let mut scheduler = Scheduler::new();
    let mut polling = PollingFallback::start(job(), INTERVAL, &mut Vec::new());
    polling.cancel(&mut scheduler);

    assert_eq!(polling.on_response(Ok(processing(50)), &mut scheduler, clock.now()), None);
    assert!(!scheduler.has_timers());
}
