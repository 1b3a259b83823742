//! probekit Trackers
//!
//! Turns raw input events into bounded, newest-first logs with derived
//! metrics, one tracker per diagnostic screen:
//!
//! - **Tap:** screen/button presses with inter-tap latency
//! - **Swipe:** completed pan gestures classified into a cardinal
//!   direction, with distance and velocity
//! - **Key:** single-character insertions/deletions inferred from
//!   successive text-buffer snapshots
//!
//! The trackers are independent. [`ProbeSession`] holds one of each and
//! routes recorded events to them; [`Replayer`] drives a session from a
//! recorded stream and can write the emitted entries as JSONL.

pub mod bounded_log;
pub mod key;
pub mod swipe;
pub mod tap;
pub mod writer;

use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::Serialize;

use probekit_common::clock::{format_time_of_day, Clock, ManualClock};
use probekit_common::config::AppConfig;
use probekit_common::error::{ProbeError, ProbeResult};
use probekit_event_model::entry::LogEntry;
use probekit_event_model::event::{
    parse_events, parse_header, EventKind, EventStreamHeader, InputEvent, Point, Screen,
};

pub use bounded_log::BoundedLog;
pub use key::{KeySnapshot, KeyTracker};
pub use swipe::{SwipeSnapshot, SwipeTracker};
pub use tap::{TapSnapshot, TapTracker};

/// Default strftime pattern for entry timestamps ("3:04:05 PM").
pub const DEFAULT_TIME_FORMAT: &str = "%-I:%M:%S %p";

pub(crate) fn display_timestamp<C: Clock>(clock: &C, pattern: &str) -> String {
    format_time_of_day(clock.time_of_day(), pattern)
}

/// Outbound state of all three screens.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub tap: TapSnapshot,
    pub swipe: SwipeSnapshot,
    pub key: KeySnapshot,
}

/// One tracker per screen, sharing a clock.
pub struct ProbeSession<C: Clock + Clone> {
    taps: TapTracker<C>,
    swipes: SwipeTracker<C>,
    keys: KeyTracker<C>,
}

impl<C: Clock + Clone> ProbeSession<C> {
    pub fn new(clock: C, config: &AppConfig) -> Self {
        Self {
            taps: TapTracker::from_config(clock.clone(), config),
            swipes: SwipeTracker::from_config(clock.clone(), config),
            keys: KeyTracker::from_config(clock, config),
        }
    }

    /// Route an event to the tracker that owns it.
    ///
    /// Returns the entry the tracker logged, if any. Resets and
    /// non-terminal gesture updates return `None`.
    pub fn apply(&mut self, event: &InputEvent) -> Option<LogEntry> {
        match &event.kind {
            EventKind::Tap { source, .. } => {
                Some(self.taps.record_tap(*source, event.tap_position()).into())
            }
            EventKind::Gesture(update) => self.swipes.handle_gesture(update).map(Into::into),
            EventKind::TextChange { text } => self.keys.record_text_change(text).map(Into::into),
            EventKind::Reset { screen } => {
                self.reset(*screen);
                None
            }
            EventKind::ClearKeyLog => {
                self.keys.clear_logs();
                None
            }
        }
    }

    /// Reset one screen's tracker.
    pub fn reset(&mut self, screen: Screen) {
        match screen {
            Screen::Tap => self.taps.reset(),
            Screen::Swipe => self.swipes.reset(),
            Screen::Key => self.keys.reset(),
        }
    }

    pub fn reset_all(&mut self) {
        self.taps.reset();
        self.swipes.reset();
        self.keys.reset();
    }

    pub fn taps(&self) -> &TapTracker<C> {
        &self.taps
    }

    pub fn taps_mut(&mut self) -> &mut TapTracker<C> {
        &mut self.taps
    }

    pub fn swipes(&self) -> &SwipeTracker<C> {
        &self.swipes
    }

    pub fn swipes_mut(&mut self) -> &mut SwipeTracker<C> {
        &mut self.swipes
    }

    pub fn keys(&self) -> &KeyTracker<C> {
        &self.keys
    }

    pub fn keys_mut(&mut self) -> &mut KeyTracker<C> {
        &mut self.keys
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            tap: self.taps.snapshot(),
            swipe: self.swipes.snapshot(),
            key: self.keys.snapshot(),
        }
    }
}

/// Counts from a finished replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReplaySummary {
    /// Events fed to the session.
    pub events: u64,
    /// Entries the trackers produced.
    pub entries: u64,
    /// Events that produced no entry.
    pub silent: u64,
}

/// Drives a session from a recorded stream on a manual clock.
///
/// Each event moves the clock to `header.epoch_ms + event.offset_ms`
/// before it is applied.
pub struct Replayer {
    clock: Rc<ManualClock>,
    epoch_ms: i64,
    session: ProbeSession<Rc<ManualClock>>,
    writer: Option<writer::EntryWriter>,
    summary: ReplaySummary,
}

impl Replayer {
    pub fn new(header: &EventStreamHeader, config: &AppConfig) -> Self {
        let clock = Rc::new(ManualClock::new(header.epoch_ms));
        Self {
            session: ProbeSession::new(Rc::clone(&clock), config),
            clock,
            epoch_ms: header.epoch_ms,
            writer: None,
            summary: ReplaySummary::default(),
        }
    }

    /// Also write every emitted entry to `path`.
    pub fn with_output(mut self, path: PathBuf, header: &EventStreamHeader) -> ProbeResult<Self> {
        self.writer = Some(writer::EntryWriter::new(path, header)?);
        Ok(self)
    }

    /// Apply one event at its recorded time.
    pub fn step(&mut self, event: &InputEvent) -> ProbeResult<Option<LogEntry>> {
        let offset = i64::try_from(event.offset_ms).unwrap_or(i64::MAX);
        self.clock.set_ms(self.epoch_ms.saturating_add(offset));

        self.summary.events += 1;
        let entry = self.session.apply(event);
        match &entry {
            Some(entry) => {
                self.summary.entries += 1;
                if let Some(writer) = self.writer.as_mut() {
                    writer.write_entry(entry)?;
                }
            }
            None => {
                self.summary.silent += 1;
                tracing::trace!(
                    t = event.offset_ms,
                    screen = ?event.screen(),
                    "Event produced no entry"
                );
            }
        }
        Ok(entry)
    }

    /// Apply every event in order and flush the output.
    pub fn run(&mut self, events: &[InputEvent]) -> ProbeResult<ReplaySummary> {
        tracing::info!(events = events.len(), "Replay started");
        for event in events {
            self.step(event)?;
        }
        if let Some(writer) = self.writer.as_mut() {
            writer.flush()?;
        }
        tracing::info!(
            entries = self.summary.entries,
            silent = self.summary.silent,
            "Replay finished"
        );
        Ok(self.summary)
    }

    pub fn session(&self) -> &ProbeSession<Rc<ManualClock>> {
        &self.session
    }

    pub fn summary(&self) -> ReplaySummary {
        self.summary
    }
}

/// A recorded event stream read from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct EventFile {
    /// The stream header, or a default one when the file has none.
    pub header: EventStreamHeader,
    pub has_header: bool,
    pub events: Vec<InputEvent>,
}

/// Read and parse a JSONL event file.
pub fn load_event_file(path: &Path) -> ProbeResult<EventFile> {
    if !path.exists() {
        return Err(ProbeError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    let header = parse_header(&content)
        .map_err(|e| ProbeError::event_stream(format!("{}: bad header, {e}", path.display())))?;
    let events = parse_events(&content)
        .map_err(|e| ProbeError::event_stream(format!("{}: {e}", path.display())))?;

    tracing::debug!(path = %path.display(), events = events.len(), "Loaded event file");
    Ok(EventFile {
        has_header: header.is_some(),
        header: header.unwrap_or_default(),
        events,
    })
}

/// Round a position to whole pixels, as the tap screen shows it.
pub fn rounded_point(point: Point) -> (i64, i64) {
    (point.x.round() as i64, point.y.round() as i64)
}
