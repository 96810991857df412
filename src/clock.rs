//! Injected wall-clock abstraction.
//!
//! Every time-relative rule (booking validation, state filters, comment
//! gating) reads "now" exactly once per operation through this trait, so
//! tests can pin the clock instead of racing the real one.

use chrono::NaiveDateTime;

pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Production clock backed by the system time (UTC).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Utc::now().naive_utc()
    }
}

/// Test clock pinned to a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn fixed_clock_returns_the_pinned_instant() {
        let instant = NaiveDate::from_ymd_opt(2025, 7, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let clock = FixedClock(instant);
        assert_eq!(clock.now(), instant);
        assert_eq!(clock.now(), clock.now());
    }
}
