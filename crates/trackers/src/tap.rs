//! Tap tracking with cross-source inter-tap latency.
//!
//! Screen and button taps share one "last tap" reference, so the gap
//! reported for a tap is measured from the previous tap of either source.

use serde::Serialize;

use probekit_common::clock::Clock;
use probekit_common::config::AppConfig;
use probekit_event_model::entry::TapEntry;
use probekit_event_model::event::{Point, TapKind};

use crate::bounded_log::BoundedLog;
use crate::{display_timestamp, DEFAULT_TIME_FORMAT};

/// Default number of tap entries kept.
pub const TAP_LOG_CAP: usize = 20;

/// Outbound view of the tap screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TapSnapshot {
    pub tap_count: u64,
    pub time_between_taps_ms: Option<u64>,
    pub last_coordinates: Option<Point>,
    pub entries: Vec<TapEntry>,
}

/// Records taps into a bounded newest-first log.
#[derive(Debug)]
pub struct TapTracker<C: Clock> {
    clock: C,
    time_format: String,
    log: BoundedLog<TapEntry>,
    tap_count: u64,
    last_tap_ms: Option<i64>,
    time_between_taps: Option<u64>,
    last_coordinates: Option<Point>,
    last_id: Option<i64>,
}

impl<C: Clock> TapTracker<C> {
    /// Create a tracker keeping at most `cap` entries.
    pub fn new(clock: C, cap: usize) -> Self {
        Self {
            clock,
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            log: BoundedLog::new(cap),
            tap_count: 0,
            last_tap_ms: None,
            time_between_taps: None,
            last_coordinates: None,
            last_id: None,
        }
    }

    /// Create a tracker with the configured cap and time format.
    pub fn from_config(clock: C, config: &AppConfig) -> Self {
        Self::new(clock, config.limits.tap_log_cap)
            .with_time_format(config.display.time_format.clone())
    }

    /// Render entry timestamps with a different strftime pattern.
    pub fn with_time_format(mut self, pattern: impl Into<String>) -> Self {
        self.time_format = pattern.into();
        self
    }

    /// Record a tap and return the logged entry.
    ///
    /// Coordinates are stored as given, without clamping. Only taps that
    /// carry coordinates replace the last known position.
    pub fn record_tap(&mut self, source: TapKind, coordinates: Option<Point>) -> TapEntry {
        let now = self.clock.now_ms();
        self.tap_count += 1;

        let time_since_last = self
            .last_tap_ms
            .map(|prev| now.saturating_sub(prev).max(0) as u64);
        if time_since_last.is_some() {
            self.time_between_taps = time_since_last;
        }
        if coordinates.is_some() {
            self.last_coordinates = coordinates;
        }
        self.last_tap_ms = Some(now);

        let entry = TapEntry {
            id: self.next_id(now),
            kind: source,
            coordinates,
            timestamp: display_timestamp(&self.clock, &self.time_format),
            time_since_last,
        };

        tracing::debug!(
            id = entry.id,
            source = ?source,
            time_since_last = ?time_since_last,
            count = self.tap_count,
            "Tap recorded"
        );
        if let Some(evicted) = self.log.push(entry.clone()) {
            tracing::trace!(id = evicted.id, "Tap log full, dropped oldest entry");
        }
        entry
    }

    /// Record a tap on the screen surface at `point`.
    pub fn record_screen_tap(&mut self, point: Point) -> TapEntry {
        self.record_tap(TapKind::Screen, Some(point))
    }

    /// Record a press of the tap button.
    pub fn record_button_tap(&mut self) -> TapEntry {
        self.record_tap(TapKind::Button, None)
    }

    /// Return to the empty initial state. Idempotent.
    pub fn reset(&mut self) {
        self.log.clear();
        self.tap_count = 0;
        self.last_tap_ms = None;
        self.time_between_taps = None;
        self.last_coordinates = None;
        tracing::debug!("Tap tracker reset");
    }

    /// Ids follow the clock but never repeat or go backwards.
    fn next_id(&mut self, now: i64) -> i64 {
        let id = match self.last_id {
            Some(last) if now <= last => last + 1,
            _ => now,
        };
        self.last_id = Some(id);
        id
    }

    pub fn log(&self) -> &BoundedLog<TapEntry> {
        &self.log
    }

    /// Logged taps, newest first.
    pub fn entries(&self) -> Vec<TapEntry> {
        self.log.to_vec()
    }

    /// Taps recorded since creation or the last reset.
    pub fn tap_count(&self) -> u64 {
        self.tap_count
    }

    /// Gap before the most recent tap, once there have been two.
    pub fn time_between_taps(&self) -> Option<u64> {
        self.time_between_taps
    }

    pub fn last_coordinates(&self) -> Option<Point> {
        self.last_coordinates
    }

    pub fn snapshot(&self) -> TapSnapshot {
        TapSnapshot {
            tap_count: self.tap_count,
            time_between_taps_ms: self.time_between_taps,
            last_coordinates: self.last_coordinates,
            entries: self.entries(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use probekit_common::clock::ManualClock;

    fn tracker(start_ms: i64) -> (std::rc::Rc<ManualClock>, TapTracker<std::rc::Rc<ManualClock>>) {
        let clock = std::rc::Rc::new(ManualClock::new(start_ms));
        let tracker = TapTracker::new(clock.clone(), TAP_LOG_CAP);
        (clock, tracker)
    }

    #[test]
    fn test_first_tap_has_no_gap() {
        let (_clock, mut taps) = tracker(10_000);
        let entry = taps.record_screen_tap(Point::new(12.0, 34.0));
        assert_eq!(entry.kind, TapKind::Screen);
        assert_eq!(entry.time_since_last, None);
        assert_eq!(entry.coordinates, Some(Point::new(12.0, 34.0)));
        assert_eq!(taps.tap_count(), 1);
        assert_eq!(taps.time_between_taps(), None);
    }

    #[test]
    fn test_latency_spans_sources() {
        let (clock, mut taps) = tracker(0);
        taps.record_screen_tap(Point::new(1.0, 1.0));
        clock.advance_ms(300);
        let button = taps.record_button_tap();
        assert_eq!(button.time_since_last, Some(300));
        clock.advance_ms(125);
        let screen = taps.record_screen_tap(Point::new(2.0, 2.0));
        assert_eq!(screen.time_since_last, Some(125));
        assert_eq!(taps.time_between_taps(), Some(125));
    }

    #[test]
    fn test_button_tap_keeps_last_coordinates() {
        let (clock, mut taps) = tracker(0);
        taps.record_screen_tap(Point::new(50.0, 60.0));
        clock.advance_ms(10);
        let entry = taps.record_button_tap();
        assert_eq!(entry.coordinates, None);
        assert_eq!(taps.last_coordinates(), Some(Point::new(50.0, 60.0)));
    }

    #[test]
    fn test_out_of_bounds_coordinates_accepted() {
        let (_clock, mut taps) = tracker(0);
        let entry = taps.record_screen_tap(Point::new(-5.0, 1e9));
        assert_eq!(entry.coordinates, Some(Point::new(-5.0, 1e9)));
    }

    #[test]
    fn test_ids_unique_within_same_millisecond() {
        let (clock, mut taps) = tracker(5_000);
        let a = taps.record_button_tap();
        let b = taps.record_button_tap();
        clock.advance_ms(1);
        let c = taps.record_button_tap();
        assert_eq!(a.id, 5_000);
        assert_eq!(b.id, 5_001);
        assert_eq!(c.id, 5_002);
        assert_eq!(b.time_since_last, Some(0));
    }

    #[test]
    fn test_clock_going_backwards_gives_zero_gap() {
        let (clock, mut taps) = tracker(1_000);
        taps.record_button_tap();
        clock.set_ms(400);
        let entry = taps.record_button_tap();
        assert_eq!(entry.time_since_last, Some(0));
        assert!(entry.id > 1_000);
    }

    #[test]
    fn test_log_capped_at_twenty() {
        let (clock, mut taps) = tracker(0);
        for _ in 0..25 {
            clock.advance_ms(100);
            taps.record_button_tap();
        }
        assert_eq!(taps.log().len(), 20);
        assert_eq!(taps.tap_count(), 25);
        assert_eq!(taps.log().latest().map(|e| e.id), Some(2_500));
        assert_eq!(taps.log().oldest().map(|e| e.id), Some(600));
    }

    #[test]
    fn test_timestamp_uses_time_format() {
        let clock = ManualClock::new(((15 * 60 + 4) * 60 + 5) * 1_000);
        let mut taps = TapTracker::new(&clock, TAP_LOG_CAP);
        assert_eq!(taps.record_button_tap().timestamp, "3:04:05 PM");

        let mut taps = TapTracker::new(&clock, TAP_LOG_CAP).with_time_format("%H:%M:%S");
        assert_eq!(taps.record_button_tap().timestamp, "15:04:05");
    }

    #[test]
    fn test_reset_is_idempotent() {
        let (clock, mut taps) = tracker(0);
        taps.record_screen_tap(Point::new(1.0, 2.0));
        clock.advance_ms(50);
        taps.record_button_tap();

        taps.reset();
        let once = taps.snapshot();
        taps.reset();
        assert_eq!(taps.snapshot(), once);
        assert_eq!(once.tap_count, 0);
        assert!(once.entries.is_empty());
        assert_eq!(once.time_between_taps_ms, None);
        assert_eq!(once.last_coordinates, None);

        clock.advance_ms(50);
        assert_eq!(taps.record_button_tap().time_since_last, None);
    }
}
