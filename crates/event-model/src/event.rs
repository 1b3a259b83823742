//! Inbound input events for the probekit event stream.
//!
//! The host input layer delivers well-formed payloads; this module only
//! gives them a shape. Recorded streams are JSONL: an optional
//! `# {header}` comment line followed by one event per line.

use serde::{Deserialize, Serialize};

/// Milliseconds since the start of the recorded session.
pub type OffsetMs = u64;

/// A position in the containing surface's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Where a tap came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TapKind {
    /// Anywhere on the screen surface; carries coordinates.
    Screen,
    /// The dedicated tap button; no coordinates.
    Button,
    /// An absolutely positioned overlay control.
    Absolute,
}

impl TapKind {
    /// Upper-case label used in rendered tap entries.
    pub fn label(self) -> &'static str {
        match self {
            Self::Screen => "SCREEN",
            Self::Button => "BUTTON",
            Self::Absolute => "ABSOLUTE",
        }
    }
}

/// Lifecycle state of a pan gesture, as reported by the gesture stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureState {
    Undetermined,
    Began,
    Active,
    End,
    Cancelled,
    Failed,
}

impl GestureState {
    /// Only a completed gesture produces a swipe entry.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::End)
    }
}

/// One update from a pan gesture stream. Translation and velocity are
/// cumulative since the gesture began.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureUpdate {
    pub translation_x: f64,
    pub translation_y: f64,
    pub velocity_x: f64,
    pub velocity_y: f64,
    pub state: GestureState,
}

impl GestureUpdate {
    /// A terminal update with the given translation and velocity.
    pub fn end(translation: (f64, f64), velocity: (f64, f64)) -> Self {
        Self {
            translation_x: translation.0,
            translation_y: translation.1,
            velocity_x: velocity.0,
            velocity_y: velocity.1,
            state: GestureState::End,
        }
    }
}

/// The diagnostic screens, one per tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Tap,
    Swipe,
    Key,
}

/// A single recorded input event with its session offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputEvent {
    /// Milliseconds since session start.
    #[serde(rename = "t")]
    pub offset_ms: OffsetMs,

    /// The event payload.
    #[serde(flatten)]
    pub kind: EventKind,
}

/// Discriminated union of event types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// A press on the tap screen.
    Tap {
        source: TapKind,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        x: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        y: Option<f64>,
    },

    /// An update from the swipe screen's pan gesture stream.
    Gesture(GestureUpdate),

    /// The typewriter buffer changed; carries the full new content.
    TextChange { text: String },

    /// The user pressed a screen's reset control.
    Reset { screen: Screen },

    /// The typewriter's "clear logs" control; the buffer is kept.
    ClearKeyLog,
}

/// Stream metadata, stored as the first `#` line of an event file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventStreamHeader {
    /// Schema version for forward compatibility.
    pub schema_version: String,

    /// Wall-clock milliseconds since the Unix epoch at session start.
    pub epoch_ms: i64,

    /// Free-form note about what was being verified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Default for EventStreamHeader {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            epoch_ms: 0,
            description: None,
        }
    }
}

/// Current event stream schema version.
pub const SCHEMA_VERSION: &str = "1.0";

impl InputEvent {
    /// Create a screen tap at a position.
    pub fn screen_tap(offset_ms: OffsetMs, x: f64, y: f64) -> Self {
        Self {
            offset_ms,
            kind: EventKind::Tap {
                source: TapKind::Screen,
                x: Some(x),
                y: Some(y),
            },
        }
    }

    /// Create a button tap.
    pub fn button_tap(offset_ms: OffsetMs) -> Self {
        Self {
            offset_ms,
            kind: EventKind::Tap {
                source: TapKind::Button,
                x: None,
                y: None,
            },
        }
    }

    /// Create a gesture-stream update.
    pub fn gesture(offset_ms: OffsetMs, update: GestureUpdate) -> Self {
        Self {
            offset_ms,
            kind: EventKind::Gesture(update),
        }
    }

    /// Create a text-buffer change.
    pub fn text_change(offset_ms: OffsetMs, text: impl Into<String>) -> Self {
        Self {
            offset_ms,
            kind: EventKind::TextChange { text: text.into() },
        }
    }

    /// Create a reset for one screen.
    pub fn reset(offset_ms: OffsetMs, screen: Screen) -> Self {
        Self {
            offset_ms,
            kind: EventKind::Reset { screen },
        }
    }

    /// Tap position, present only when both coordinates were recorded.
    pub fn tap_position(&self) -> Option<Point> {
        match &self.kind {
            EventKind::Tap {
                x: Some(x),
                y: Some(y),
                ..
            } => Some(Point::new(*x, *y)),
            _ => None,
        }
    }

    /// The screen whose tracker consumes this event.
    pub fn screen(&self) -> Screen {
        match &self.kind {
            EventKind::Tap { .. } => Screen::Tap,
            EventKind::Gesture(_) => Screen::Swipe,
            EventKind::TextChange { .. } | EventKind::ClearKeyLog => Screen::Key,
            EventKind::Reset { screen } => *screen,
        }
    }
}

/// A line in an event stream that failed to parse.
#[derive(Debug, thiserror::Error)]
#[error("line {line}: {source}")]
pub struct EventParseError {
    /// One-based line number in the input.
    pub line: usize,
    #[source]
    pub source: serde_json::Error,
}

/// Parse events from JSONL content (one JSON object per line).
///
/// Blank lines and `#` comment lines (including the header) are skipped.
pub fn parse_events(jsonl: &str) -> Result<Vec<InputEvent>, EventParseError> {
    jsonl
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line, text)| {
            serde_json::from_str(text).map_err(|source| EventParseError { line, source })
        })
        .collect()
}

/// Extract the stream header from the first `#` line, if there is one.
pub fn parse_header(jsonl: &str) -> Result<Option<EventStreamHeader>, EventParseError> {
    for (idx, line) in jsonl.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some(comment) = line.strip_prefix('#') else {
            return Ok(None);
        };
        return serde_json::from_str(comment.trim())
            .map(Some)
            .map_err(|source| EventParseError {
                line: idx + 1,
                source,
            });
    }
    Ok(None)
}

/// Serialize events to JSONL format, with the header as a comment line.
pub fn serialize_events(
    header: Option<&EventStreamHeader>,
    events: &[InputEvent],
) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    if let Some(header) = header {
        output.push_str("# ");
        output.push_str(&serde_json::to_string(header)?);
        output.push('\n');
    }
    for event in events {
        output.push_str(&serde_json::to_string(event)?);
        output.push('\n');
    }
    Ok(output)
}
