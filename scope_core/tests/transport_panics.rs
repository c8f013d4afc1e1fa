//! Panic hook routing. Kept in its own test binary because the hook is
//! process-global.
use std::error::Error;
use std::panic;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use scope_core::mocks::{ScriptedSensor, Step};
use scope_core::{
    Dispatcher, PollError, PollOutcome, Session, Tick, poll_once, quiet_transport_panics,
};
use scope_traits::{Sensor, SensorKind};

const TIMEOUT: Duration = Duration::from_millis(50);

struct PanickingTare;

impl Sensor for PanickingTare {
    fn read(&mut self, _timeout: Duration) -> Result<f64, Box<dyn Error + Send + Sync>> {
        Ok(1.0)
    }

    fn tare(&mut self, _timeout: Duration) -> Result<(), Box<dyn Error + Send + Sync>> {
        panic!("tare exploded")
    }
}

#[test]
fn only_transport_panics_are_kept_off_the_previous_hook() {
    let reported = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&reported);
    panic::set_hook(Box::new(move |_| {
        seen.fetch_add(1, Ordering::SeqCst);
    }));
    quiet_transport_panics();
    // A second install must not stack another hook.
    quiet_transport_panics();

    let session = Arc::new(Session::builder().kind(SensorKind::Weight).build().unwrap());
    let mut sensor = ScriptedSensor::new(vec![Step::Panic]);
    let tick = poll_once(&session, &mut sensor, TIMEOUT);
    assert_eq!(
        tick,
        Tick::Recorded(PollOutcome::Failed(PollError::Other(
            "scripted transport panic".into()
        )))
    );
    assert_eq!(reported.load(Ordering::SeqCst), 0);

    let mut d = Dispatcher::new(Arc::clone(&session), PanickingTare, TIMEOUT);
    let notice = d.tare();
    assert_eq!(notice.error, Some(PollError::Other("tare exploded".into())));
    assert_eq!(notice.text, "Tare failed: Error: tare exploded");
    assert_eq!(reported.load(Ordering::SeqCst), 0);

    let outside = panic::catch_unwind(|| panic!("not a device call"));
    assert!(outside.is_err());
    assert_eq!(reported.load(Ordering::SeqCst), 1);
}
