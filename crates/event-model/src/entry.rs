//! Log entries produced by the trackers.
//!
//! Every entry carries a display-formatted `timestamp` (already rendered
//! with the configured time format) plus the metrics derived for it.
//! `Display` renders the one-line form shown on the diagnostic screens.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::event::{Point, TapKind};

/// Key label logged when an insertion slice comes out empty.
pub const SPACE_KEY: &str = "space";

/// Key label logged when a deletion has no character at the cut index.
pub const BACKSPACE_KEY: &str = "backspace";

/// A recorded tap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TapEntry {
    /// Unique, strictly increasing, time-based id.
    pub id: i64,

    #[serde(rename = "type")]
    pub kind: TapKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Point>,

    pub timestamp: String,

    /// Milliseconds since the previous tap from any source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_since_last: Option<u64>,
}

impl fmt::Display for TapEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.timestamp, self.kind.label())?;
        if let Some(p) = self.coordinates {
            write!(f, " ({}, {})", p.x.round(), p.y.round())?;
        }
        // A zero gap is not shown.
        match self.time_since_last {
            Some(gap) if gap > 0 => write!(f, " - {gap}ms"),
            _ => Ok(()),
        }
    }
}

/// Cardinal direction of a completed swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Up => "Up",
            Self::Down => "Down",
            Self::Left => "Left",
            Self::Right => "Right",
        };
        f.write_str(name)
    }
}

/// A recorded swipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwipeEntry {
    pub direction: Direction,
    /// Rounded translation magnitude.
    pub distance: u64,
    /// Rounded velocity magnitude.
    pub velocity: u64,
    pub timestamp: String,
}

impl fmt::Display for SwipeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} | Distance: {}px | Velocity: {}",
            self.timestamp, self.direction, self.distance, self.velocity
        )
    }
}

/// Whether a key event grew or shrank the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    Added,
    Deleted,
}

impl KeyAction {
    fn sign(self) -> char {
        match self {
            Self::Added => '+',
            Self::Deleted => '-',
        }
    }
}

/// A recorded key event inferred from a buffer change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEntry {
    /// The inserted slice, the deleted character, or a sentinel
    /// ([`SPACE_KEY`], [`BACKSPACE_KEY`]).
    pub key: String,
    pub timestamp: String,
    pub action: KeyAction,
}

impl fmt::Display for KeyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}\"{}\"", self.timestamp, self.action.sign(), self.key)
    }
}

/// Any tracker entry, tagged with the tracker that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tracker", rename_all = "snake_case")]
pub enum LogEntry {
    Tap(TapEntry),
    Swipe(SwipeEntry),
    Key(KeyEntry),
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tap(entry) => fmt::Display::fmt(entry, f),
            Self::Swipe(entry) => fmt::Display::fmt(entry, f),
            Self::Key(entry) => fmt::Display::fmt(entry, f),
        }
    }
}

impl From<TapEntry> for LogEntry {
    fn from(entry: TapEntry) -> Self {
        Self::Tap(entry)
    }
}

impl From<SwipeEntry> for LogEntry {
    fn from(entry: SwipeEntry) -> Self {
        Self::Swipe(entry)
    }
}

impl From<KeyEntry> for LogEntry {
    fn from(entry: KeyEntry) -> Self {
        Self::Key(entry)
    }
}
