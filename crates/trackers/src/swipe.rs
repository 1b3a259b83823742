//! Swipe tracking over a pan gesture stream.
//!
//! Only the terminal update of a gesture is classified. Intermediate
//! updates and gestures that never complete leave no trace.

use serde::Serialize;

use probekit_common::clock::Clock;
use probekit_common::config::AppConfig;
use probekit_event_model::entry::{Direction, SwipeEntry};
use probekit_event_model::event::GestureUpdate;

use crate::bounded_log::BoundedLog;
use crate::{display_timestamp, DEFAULT_TIME_FORMAT};

/// Default number of swipe entries kept.
pub const SWIPE_LOG_CAP: usize = 10;

/// Outbound view of the swipe screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwipeSnapshot {
    pub swipe_count: u64,
    pub entries: Vec<SwipeEntry>,
}

/// Classify a translation into a cardinal direction.
///
/// Horizontal wins only when strictly dominant, so `|dx| == |dy|`
/// (including the zero vector) falls to the vertical branch, and a zero
/// `dy` there reads as `Up`.
pub fn classify_direction(dx: f64, dy: f64) -> Direction {
    if dx.abs() > dy.abs() {
        if dx > 0.0 {
            Direction::Right
        } else {
            Direction::Left
        }
    } else if dy > 0.0 {
        Direction::Down
    } else {
        Direction::Up
    }
}

/// Euclidean length of `(x, y)`, rounded to the nearest integer.
pub fn magnitude(x: f64, y: f64) -> u64 {
    // Saturating cast: NaN maps to 0.
    x.hypot(y).round() as u64
}

/// Records completed swipes into a bounded newest-first log.
#[derive(Debug)]
pub struct SwipeTracker<C: Clock> {
    clock: C,
    time_format: String,
    log: BoundedLog<SwipeEntry>,
    swipe_count: u64,
}

impl<C: Clock> SwipeTracker<C> {
    pub fn new(clock: C, cap: usize) -> Self {
        Self {
            clock,
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            log: BoundedLog::new(cap),
            swipe_count: 0,
        }
    }

    pub fn from_config(clock: C, config: &AppConfig) -> Self {
        Self::new(clock, config.limits.swipe_log_cap)
            .with_time_format(config.display.time_format.clone())
    }

    pub fn with_time_format(mut self, pattern: impl Into<String>) -> Self {
        self.time_format = pattern.into();
        self
    }

    /// Feed one gesture-stream update. Returns an entry only for the
    /// terminal update.
    pub fn handle_gesture(&mut self, update: &GestureUpdate) -> Option<SwipeEntry> {
        if !update.state.is_terminal() {
            tracing::trace!(state = ?update.state, "Ignoring non-terminal gesture update");
            return None;
        }
        Some(self.record_swipe_end(
            (update.translation_x, update.translation_y),
            (update.velocity_x, update.velocity_y),
        ))
    }

    /// Classify a completed swipe and log it.
    pub fn record_swipe_end(
        &mut self,
        translation: (f64, f64),
        velocity: (f64, f64),
    ) -> SwipeEntry {
        let (dx, dy) = translation;
        let entry = SwipeEntry {
            direction: classify_direction(dx, dy),
            distance: magnitude(dx, dy),
            velocity: magnitude(velocity.0, velocity.1),
            timestamp: display_timestamp(&self.clock, &self.time_format),
        };
        self.swipe_count += 1;

        tracing::debug!(
            direction = ?entry.direction,
            distance = entry.distance,
            velocity = entry.velocity,
            count = self.swipe_count,
            "Swipe recorded"
        );
        if self.log.push(entry.clone()).is_some() {
            tracing::trace!("Swipe log full, dropped oldest entry");
        }
        entry
    }

    /// Return to the empty initial state. Idempotent.
    pub fn reset(&mut self) {
        self.log.clear();
        self.swipe_count = 0;
        tracing::debug!("Swipe tracker reset");
    }

    pub fn log(&self) -> &BoundedLog<SwipeEntry> {
        &self.log
    }

    /// Logged swipes, newest first.
    pub fn entries(&self) -> Vec<SwipeEntry> {
        self.log.to_vec()
    }

    pub fn swipe_count(&self) -> u64 {
        self.swipe_count
    }

    pub fn snapshot(&self) -> SwipeSnapshot {
        SwipeSnapshot {
            swipe_count: self.swipe_count,
            entries: self.entries(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use probekit_common::clock::ManualClock;
    use probekit_event_model::event::GestureState;

    #[test]
    fn test_direction_table() {
        assert_eq!(classify_direction(100.0, 0.0), Direction::Right);
        assert_eq!(classify_direction(-50.0, 10.0), Direction::Left);
        assert_eq!(classify_direction(0.0, 80.0), Direction::Down);
        assert_eq!(classify_direction(0.0, -80.0), Direction::Up);
    }

    #[test]
    fn test_equal_axes_resolve_vertically() {
        assert_eq!(classify_direction(5.0, -5.0), Direction::Up);
        assert_eq!(classify_direction(-5.0, 5.0), Direction::Down);
        assert_eq!(classify_direction(5.0, 5.0), Direction::Down);
    }

    #[test]
    fn test_zero_vector_is_up_with_zero_distance() {
        let clock = ManualClock::new(0);
        let mut swipes = SwipeTracker::new(&clock, SWIPE_LOG_CAP);
        let entry = swipes.record_swipe_end((0.0, 0.0), (0.0, 0.0));
        assert_eq!(entry.direction, Direction::Up);
        assert_eq!(entry.distance, 0);
        assert_eq!(entry.velocity, 0);
        assert_eq!(swipes.swipe_count(), 1);
    }

    #[test]
    fn test_metrics_are_rounded_magnitudes() {
        assert_eq!(magnitude(3.0, 4.0), 5);
        assert_eq!(magnitude(-3.0, -4.0), 5);
        assert_eq!(magnitude(1.0, 1.0), 1);
        assert_eq!(magnitude(0.2, 0.2), 0);
        assert_eq!(magnitude(f64::NAN, 1.0), 0);

        let clock = ManualClock::new(0);
        let mut swipes = SwipeTracker::new(&clock, SWIPE_LOG_CAP);
        let entry = swipes.record_swipe_end((3.0, 4.0), (600.0, -800.0));
        assert_eq!(entry.direction, Direction::Down);
        assert_eq!(entry.distance, 5);
        assert_eq!(entry.velocity, 1_000);
    }

    #[test]
    fn test_only_terminal_updates_are_logged() {
        let clock = ManualClock::new(0);
        let mut swipes = SwipeTracker::new(&clock, SWIPE_LOG_CAP);
        for state in [
            GestureState::Began,
            GestureState::Active,
            GestureState::Cancelled,
            GestureState::Failed,
        ] {
            let update = GestureUpdate {
                state,
                ..GestureUpdate::end((40.0, 0.0), (1.0, 0.0))
            };
            assert_eq!(swipes.handle_gesture(&update), None);
        }
        assert!(swipes.log().is_empty());

        let entry = swipes.handle_gesture(&GestureUpdate::end((40.0, 0.0), (1.0, 0.0)));
        assert_eq!(entry.map(|e| e.direction), Some(Direction::Right));
        assert_eq!(swipes.swipe_count(), 1);
    }

    #[test]
    fn test_log_capped_at_ten() {
        let clock = ManualClock::new(0);
        let mut swipes = SwipeTracker::new(&clock, SWIPE_LOG_CAP);
        for i in 1..=12 {
            swipes.record_swipe_end((f64::from(i), 0.0), (0.0, 0.0));
        }
        assert_eq!(swipes.log().len(), 10);
        assert_eq!(swipes.swipe_count(), 12);
        let distances: Vec<u64> = swipes.log().iter().map(|e| e.distance).collect();
        assert_eq!(distances, (3..=12).rev().collect::<Vec<u64>>());
    }

    #[test]
    fn test_reset_is_idempotent() {
        let clock = ManualClock::new(0);
        let mut swipes = SwipeTracker::new(&clock, SWIPE_LOG_CAP);
        swipes.record_swipe_end((1.0, 2.0), (3.0, 4.0));
        swipes.reset();
        let once = swipes.snapshot();
        swipes.reset();
        assert_eq!(swipes.snapshot(), once);
        assert_eq!(once.swipe_count, 0);
        assert!(once.entries.is_empty());
    }
}
