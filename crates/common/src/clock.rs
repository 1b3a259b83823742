//! Clock abstraction for stamping tracker entries.
//!
//! Trackers need two readings per event:
//! - a millisecond wall-clock value, used for inter-event gaps and tap ids
//! - a time of day, rendered into the entry's display timestamp
//!
//! [`SystemClock`] reads the real clock. [`ManualClock`] is driven by the
//! caller and is used for replays and tests.

use std::cell::Cell;
use std::rc::Rc;

use chrono::format::{Item, StrftimeItems};
use chrono::{Local, NaiveTime, TimeZone, Utc};

/// Source of time for trackers.
pub trait Clock {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> i64;

    /// Current time of day, used for display timestamps.
    fn time_of_day(&self) -> NaiveTime;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> i64 {
        (**self).now_ms()
    }

    fn time_of_day(&self) -> NaiveTime {
        (**self).time_of_day()
    }
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now_ms(&self) -> i64 {
        (**self).now_ms()
    }

    fn time_of_day(&self) -> NaiveTime {
        (**self).time_of_day()
    }
}

/// The real wall clock, with time of day in the local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }

    fn time_of_day(&self) -> NaiveTime {
        Local::now().time()
    }
}

/// A clock that only moves when told to.
///
/// Time of day is derived from the millisecond value in UTC so replays
/// render the same timestamps on every machine.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: Cell<i64>,
}

impl ManualClock {
    /// Create a clock reading `start_ms`.
    pub fn new(start_ms: i64) -> Self {
        Self {
            now_ms: Cell::new(start_ms),
        }
    }

    /// Jump to an absolute millisecond value. Going backwards is allowed.
    pub fn set_ms(&self, ms: i64) {
        self.now_ms.set(ms);
    }

    /// Move forward by `delta_ms`.
    pub fn advance_ms(&self, delta_ms: i64) {
        self.now_ms.set(self.now_ms.get().saturating_add(delta_ms));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now_ms.get()
    }

    fn time_of_day(&self) -> NaiveTime {
        Utc.timestamp_millis_opt(self.now_ms.get())
            .single()
            .map(|dt| dt.time())
            .unwrap_or_default()
    }
}

/// Render a time of day with a strftime pattern.
///
/// Callers should check the pattern with [`is_valid_time_format`] first;
/// an unrenderable pattern yields an empty string here.
pub fn format_time_of_day(time: NaiveTime, pattern: &str) -> String {
    use std::fmt::Write;

    let mut out = String::new();
    if write!(out, "{}", time.format(pattern)).is_err() {
        out.clear();
    }
    out
}

/// Whether chrono can render `pattern` for a time of day.
pub fn is_valid_time_format(pattern: &str) -> bool {
    StrftimeItems::new(pattern).all(|item| !matches!(item, Item::Error))
        && !format_time_of_day(NaiveTime::default(), pattern).is_empty()
}
