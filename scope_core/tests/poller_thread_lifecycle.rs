//! Poller thread lifecycle: cooperative stop, join on drop, no leaked
//! threads across repeated spawn/stop cycles.

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use scope_core::mocks::{NoopSensor, ScriptedSensor};
use scope_core::{PollCfg, Poller, Session};
use scope_traits::SensorKind;
use scope_traits::clock::MonotonicClock;

fn cfg(interval_ms: u64) -> PollCfg {
    PollCfg {
        interval: Duration::from_millis(interval_ms),
        timeout: Duration::from_millis(50),
        ..PollCfg::for_kind(SensorKind::Weight)
    }
}

fn session() -> Arc<Session> {
    Arc::new(Session::builder().kind(SensorKind::Weight).build().unwrap())
}

#[test]
fn poller_thread_exits_on_drop() {
    let poller = Poller::spawn(session(), NoopSensor, &cfg(10), MonotonicClock::new());
    std::thread::sleep(Duration::from_millis(50));
    assert!(poller.is_running());
    drop(poller);
}

#[test]
fn stop_is_idempotent_and_reports_ticks() {
    let s = session();
    let sensor = ScriptedSensor::values(&[1.0, 2.0, 3.0]);
    let reads = sensor.reads();
    let mut poller = Poller::spawn(Arc::clone(&s), sensor, &cfg(5), MonotonicClock::new());
    std::thread::sleep(Duration::from_millis(60));

    let ticks = poller.stop().unwrap();
    assert!(ticks >= 1);
    assert_eq!(poller.stop(), None);
    assert!(!poller.is_running());
    assert!(s.is_stopped());

    let snap = s.snapshot();
    assert_eq!(snap.counters.attempts(), ticks);
    assert_eq!(reads.load(Ordering::SeqCst) as u64, ticks);
}

#[test]
fn session_stop_ends_the_loop() {
    let s = session();
    let poller = Poller::spawn(Arc::clone(&s), NoopSensor, &cfg(5), MonotonicClock::new());
    s.request_stop();
    std::thread::sleep(Duration::from_millis(100));
    assert!(!poller.is_running());
}

#[test]
fn paused_poller_keeps_running_without_io() {
    let s = session();
    s.set_paused(true);
    let sensor = ScriptedSensor::values(&[1.0]);
    let reads = sensor.reads();
    let mut poller = Poller::spawn(Arc::clone(&s), sensor, &cfg(5), MonotonicClock::new());
    std::thread::sleep(Duration::from_millis(40));
    assert!(poller.is_running());
    assert_eq!(poller.stop(), Some(0));
    assert_eq!(reads.load(Ordering::SeqCst), 0);
}

#[test]
fn multiple_pollers_dont_leak_threads() {
    for _ in 0..10 {
        let poller = Poller::spawn(session(), NoopSensor, &cfg(5), MonotonicClock::new());
        std::thread::sleep(Duration::from_millis(10));
        drop(poller);
    }
}
