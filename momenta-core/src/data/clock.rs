//! Market clocks.

use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};

use super::MarketClock;

/// Approximate US equity market hours, stated in UTC.
///
/// Open 14:30–21:00 UTC on weekdays (9:30 AM – 4:00 PM EST). Holidays and
/// daylight-saving shifts are not modeled; this mirrors the simulated-account
/// semantics of the rest of the engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct UsEquityClock;

const OPEN_SECS: u32 = 14 * 3600 + 30 * 60;
const CLOSE_SECS: u32 = 21 * 3600;

impl MarketClock for UsEquityClock {
    fn is_open(&self, now: DateTime<Utc>) -> bool {
        if matches!(now.weekday(), Weekday::Sat | Weekday::Sun) {
            return false;
        }
        let secs = now.time().num_seconds_from_midnight();
        (OPEN_SECS..=CLOSE_SECS).contains(&secs)
    }
}

/// A clock that is always open — for synthetic runs and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysOpenClock;

impl MarketClock for AlwaysOpenClock {
    fn is_open(&self, _now: DateTime<Utc>) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn open_midday_on_a_weekday() {
        // 2024-06-12 is a Wednesday.
        assert!(UsEquityClock.is_open(at(2024, 6, 12, 15, 0)));
    }

    #[test]
    fn closed_on_weekends() {
        // 2024-06-15 is a Saturday, 2024-06-16 a Sunday.
        assert!(!UsEquityClock.is_open(at(2024, 6, 15, 15, 0)));
        assert!(!UsEquityClock.is_open(at(2024, 6, 16, 15, 0)));
    }

    #[test]
    fn boundaries_are_inclusive() {
        assert!(UsEquityClock.is_open(at(2024, 6, 12, 14, 30)));
        assert!(UsEquityClock.is_open(at(2024, 6, 12, 21, 0)));
        assert!(!UsEquityClock.is_open(at(2024, 6, 12, 14, 29)));
        assert!(!UsEquityClock.is_open(at(2024, 6, 12, 21, 1)));
    }

    #[test]
    fn always_open_clock_ignores_time() {
        assert!(AlwaysOpenClock.is_open(at(2024, 6, 16, 3, 0)));
    }
}
