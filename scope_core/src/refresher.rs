//! Display Refresher: a fixed-cadence loop that reads the session and hands
//! a consistent view to a render callback. It never performs device I/O.
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

use scope_traits::SensorKind;
use scope_traits::clock::{Clock, MonotonicClock};

use crate::config::DisplayCfg;
use crate::error::PollError;
use crate::session::{Notice, Session};
use crate::stats::Summary;
use crate::telemetry::RunCounters;

/// Everything one dashboard frame shows, taken from a single snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub kind: SensorKind,
    pub latest: Option<f64>,
    pub last_update: Option<SystemTime>,
    pub summary: Option<Summary>,
    pub counters: RunCounters,
    pub readings: usize,
    pub capacity: usize,
    pub last_error: Option<PollError>,
    pub notice: Option<Notice>,
    pub paused: bool,
}

impl DashboardView {
    pub fn capture(session: &Session, now: Instant, notice_ttl: Duration) -> Self {
        let snap = session.snapshot();
        Self {
            kind: session.kind(),
            latest: snap.latest(),
            last_update: snap.last_update,
            summary: snap.summary(),
            counters: snap.counters,
            readings: snap.readings.len(),
            capacity: snap.capacity,
            last_error: snap.last_error,
            notice: session.notice(now, notice_ttl),
            paused: session.is_paused(),
        }
    }
}

pub struct Refresher<C = MonotonicClock> {
    session: Arc<Session>,
    cfg: DisplayCfg,
    clock: C,
}

impl Refresher<MonotonicClock> {
    pub fn new(session: Arc<Session>, cfg: DisplayCfg) -> Self {
        Self::with_clock(session, cfg, MonotonicClock::new())
    }
}

impl<C: Clock> Refresher<C> {
    pub fn with_clock(session: Arc<Session>, cfg: DisplayCfg, clock: C) -> Self {
        Self {
            session,
            cfg,
            clock,
        }
    }

    /// Capture one frame now.
    pub fn frame(&self) -> DashboardView {
        DashboardView::capture(&self.session, self.clock.now(), self.cfg.notice_ttl)
    }

    /// Render frames every `refresh` until the session stops or `limit`
    /// elapses. Once a stop is observed exactly one more frame is rendered,
    /// so the final state (including anything the callback itself changed)
    /// is on screen. Returns the frame count.
    pub fn run<F>(&self, limit: Option<Duration>, mut render: F) -> u64
    where
        F: FnMut(&DashboardView),
    {
        let epoch = self.clock.now();
        let mut frames: u64 = 0;
        loop {
            let started = self.clock.now();
            let stopping = self.session.is_stopped();
            render(&self.frame());
            frames += 1;

            if stopping {
                break;
            }
            if limit.is_some_and(|l| self.clock.now().saturating_duration_since(epoch) >= l) {
                tracing::debug!(frames, "display run limit reached");
                break;
            }
            if !self.session.is_stopped() {
                self.clock.sleep_rest_of(self.cfg.refresh, started);
            }
        }
        frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::PollOutcome;
    use scope_traits::clock::ManualClock;

    fn session() -> Arc<Session> {
        Arc::new(Session::builder().kind(SensorKind::Weight).capacity(3).build().unwrap())
    }

    #[test]
    fn view_is_empty_before_first_reading() {
        let v = DashboardView::capture(&session(), Instant::now(), Duration::from_secs(1));
        assert_eq!(v.latest, None);
        assert_eq!(v.summary, None);
        assert_eq!(v.readings, 0);
        assert_eq!(v.capacity, 3);
        assert!(!v.paused);
    }

    #[test]
    fn view_reflects_committed_readings() {
        let s = session();
        for v in [10.0, 20.0] {
            let t = s.begin_tick();
            s.commit(t, PollOutcome::Success(v));
        }
        let v = DashboardView::capture(&s, Instant::now(), Duration::from_secs(1));
        assert_eq!(v.latest, Some(20.0));
        assert_eq!(v.summary.map(|x| x.mean), Some(15.0));
        assert_eq!(v.counters.success, 2);
        assert!(v.last_update.is_some());
    }

    #[test]
    fn run_honours_limit_on_manual_clock() {
        let clock = ManualClock::new();
        let cfg = DisplayCfg {
            refresh: Duration::from_millis(100),
            notice_ttl: Duration::from_secs(1),
        };
        let r = Refresher::with_clock(session(), cfg, clock);
        let frames = r.run(Some(Duration::from_millis(400)), |_| {});
        assert_eq!(frames, 5);
    }

    #[test]
    fn run_stops_when_session_stops() {
        let s = session();
        let r = Refresher::with_clock(Arc::clone(&s), DisplayCfg::default(), ManualClock::new());
        let mut seen = 0;
        let frames = r.run(None, |_| {
            seen += 1;
            if seen == 3 {
                s.request_stop();
            }
        });
        // One final frame after the stop.
        assert_eq!(frames, 4);
    }
}
