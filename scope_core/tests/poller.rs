use std::sync::Arc;
use std::time::Duration;

use rstest::rstest;
use scope_core::mocks::{ScriptedSensor, Step};
use scope_core::{PollError, PollOutcome, Session, Tick, poll_once};
use scope_traits::SensorKind;

const TIMEOUT: Duration = Duration::from_millis(50);

fn session(kind: SensorKind, capacity: usize) -> Session {
    Session::builder().kind(kind).capacity(capacity).build().unwrap()
}

#[test]
fn bounded_history_keeps_newest_readings() {
    let s = session(SensorKind::Weight, 3);
    let mut sensor = ScriptedSensor::values(&[10.0, 20.0, 30.0, 40.0]);
    for _ in 0..4 {
        poll_once(&s, &mut sensor, TIMEOUT);
    }
    let snap = s.snapshot();
    assert_eq!(snap.readings, vec![20.0, 30.0, 40.0]);
    let sum = snap.summary().unwrap();
    assert_eq!((sum.min, sum.max, sum.mean), (20.0, 40.0, 30.0));
    assert_eq!(snap.counters.success, 4);
}

#[test]
fn timeout_after_success_keeps_history() {
    let s = session(SensorKind::Weight, 200);
    let mut sensor = ScriptedSensor::new(vec![Step::Value(12.5), Step::TimedOut]);
    poll_once(&s, &mut sensor, TIMEOUT);
    let tick = poll_once(&s, &mut sensor, TIMEOUT);
    assert_eq!(tick, Tick::Recorded(PollOutcome::Failed(PollError::Timeout)));

    let snap = s.snapshot();
    assert_eq!(snap.readings, vec![12.5]);
    assert_eq!(snap.counters.success, 1);
    assert_eq!(snap.counters.errors, 1);
    assert_eq!(snap.last_error.as_ref().map(ToString::to_string).as_deref(), Some("Connection timeout"));
}

#[rstest]
#[case::refused(Step::Refused, "Connection refused - check device IP")]
#[case::negative(Step::Value(-3.0), "Invalid sensor reading (distance < 0)")]
#[case::other(Step::Fail("socket closed".into()), "Error: socket closed")]
fn failures_are_classified(#[case] step: Step, #[case] message: &str) {
    let s = session(SensorKind::Distance, 10);
    let mut sensor = ScriptedSensor::new(vec![step]);
    poll_once(&s, &mut sensor, TIMEOUT);
    let snap = s.snapshot();
    assert!(snap.readings.is_empty());
    assert_eq!(snap.last_error.unwrap().to_string(), message);
}

#[test]
fn panicking_transport_is_other_error() {
    let s = session(SensorKind::Weight, 10);
    let mut sensor = ScriptedSensor::new(vec![Step::Panic]);
    let tick = poll_once(&s, &mut sensor, TIMEOUT);
    match tick {
        Tick::Recorded(PollOutcome::Failed(e)) => assert_eq!(e.kind_name(), "OtherError"),
        other => panic!("unexpected tick {other:?}"),
    }
}

#[test]
fn success_clears_last_error() {
    let s = session(SensorKind::Weight, 10);
    let mut sensor = ScriptedSensor::new(vec![Step::TimedOut, Step::Value(1.0)]);
    poll_once(&s, &mut sensor, TIMEOUT);
    assert!(s.snapshot().last_error.is_some());
    poll_once(&s, &mut sensor, TIMEOUT);
    assert!(s.snapshot().last_error.is_none());
}

#[test]
fn paused_session_does_no_io() {
    let s = session(SensorKind::Weight, 10);
    let mut sensor = ScriptedSensor::values(&[1.0]);
    let reads = sensor.reads();
    s.set_paused(true);
    for _ in 0..5 {
        assert_eq!(poll_once(&s, &mut sensor, TIMEOUT), Tick::Paused);
    }
    assert_eq!(reads.load(std::sync::atomic::Ordering::SeqCst), 0);
    assert_eq!(s.snapshot().counters.attempts(), 0);

    s.set_paused(false);
    poll_once(&s, &mut sensor, TIMEOUT);
    assert_eq!(s.snapshot().readings, vec![1.0]);
}

#[test]
fn clear_during_request_drops_outcome() {
    let s = Arc::new(session(SensorKind::Weight, 10));
    let mut sensor = ScriptedSensor::values(&[5.0]);
    poll_once(&s, &mut sensor, TIMEOUT);

    // Same interleaving poll_once performs, with a clear in the middle.
    let ticket = s.begin_tick();
    s.clear();
    let tick = s.commit(ticket, PollOutcome::Success(7.0));
    assert!(matches!(tick, Tick::Discarded(_)));

    let snap = s.snapshot();
    assert!(snap.readings.is_empty());
    assert_eq!(snap.counters.attempts(), 0);
}
