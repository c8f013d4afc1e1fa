//! Common time helpers for scope_core.

use std::time::Duration;

/// Number of milliseconds in one second.
pub const MILLIS_PER_SEC: u64 = 1_000;

/// Duration from a millisecond knob, floored at 1 ms so a loop never spins.
#[inline]
pub fn duration_from_ms(ms: u64) -> Duration {
    Duration::from_millis(ms.max(1))
}

/// Nominal rate of a loop with the given period, in Hz.
#[inline]
pub fn rate_hz(period: Duration) -> f64 {
    let secs = period.as_secs_f64();
    if secs > 0.0 { 1.0 / secs } else { f64::INFINITY }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_ms_floors_to_one() {
        assert_eq!(duration_from_ms(0), Duration::from_millis(1));
        assert_eq!(duration_from_ms(100), Duration::from_millis(100));
    }

    #[test]
    fn rate_of_common_periods() {
        assert_eq!(rate_hz(Duration::from_millis(100)), 10.0);
        assert_eq!(rate_hz(Duration::from_millis(MILLIS_PER_SEC)), 1.0);
        assert!(rate_hz(Duration::ZERO).is_infinite());
    }
}
