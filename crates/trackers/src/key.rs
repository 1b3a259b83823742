//! Key tracking by diffing successive text-buffer snapshots.
//!
//! The diff is length-based, not positional: growth is reported as the
//! tail beyond the old length, shrinkage as the single character at the
//! new length. Same-length edits produce nothing. Lengths and indices are
//! counted in `char`s.

use serde::Serialize;

use probekit_common::clock::Clock;
use probekit_common::config::AppConfig;
use probekit_event_model::entry::{KeyAction, KeyEntry, BACKSPACE_KEY, SPACE_KEY};

use crate::bounded_log::BoundedLog;
use crate::{display_timestamp, DEFAULT_TIME_FORMAT};

/// Default number of key entries kept.
pub const KEY_LOG_CAP: usize = 20;

/// Outbound view of the typewriter screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeySnapshot {
    pub text: String,
    pub char_count: usize,
    /// Entries currently in the log, as the screen shows it.
    pub key_events: usize,
    pub entries: Vec<KeyEntry>,
}

/// Infers key events from buffer changes.
#[derive(Debug)]
pub struct KeyTracker<C: Clock> {
    clock: C,
    time_format: String,
    log: BoundedLog<KeyEntry>,
    text: String,
    previous_text: String,
    events_recorded: u64,
}

/// What changed between two buffer snapshots.
fn diff_key(previous: &str, current: &str) -> Option<(String, KeyAction)> {
    let prev_len = previous.chars().count();
    let new_len = current.chars().count();

    if new_len > prev_len {
        let added: String = current.chars().skip(prev_len).collect();
        let key = if added.is_empty() {
            SPACE_KEY.to_string()
        } else {
            added
        };
        Some((key, KeyAction::Added))
    } else if new_len < prev_len {
        let key = previous
            .chars()
            .nth(new_len)
            .map(String::from)
            .unwrap_or_else(|| BACKSPACE_KEY.to_string());
        Some((key, KeyAction::Deleted))
    } else {
        None
    }
}

impl<C: Clock> KeyTracker<C> {
    pub fn new(clock: C, cap: usize) -> Self {
        Self {
            clock,
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            log: BoundedLog::new(cap),
            text: String::new(),
            previous_text: String::new(),
            events_recorded: 0,
        }
    }

    pub fn from_config(clock: C, config: &AppConfig) -> Self {
        Self::new(clock, config.limits.key_log_cap)
            .with_time_format(config.display.time_format.clone())
    }

    pub fn with_time_format(mut self, pattern: impl Into<String>) -> Self {
        self.time_format = pattern.into();
        self
    }

    /// Compare `new_text` with the previous buffer and log what changed.
    ///
    /// The stored buffer always becomes `new_text`, whether or not an
    /// entry was produced.
    pub fn record_text_change(&mut self, new_text: &str) -> Option<KeyEntry> {
        let change = diff_key(&self.previous_text, new_text);

        self.text = new_text.to_string();
        self.previous_text = new_text.to_string();

        let Some((key, action)) = change else {
            tracing::trace!(len = self.char_count(), "Same-length edit, nothing logged");
            return None;
        };

        let entry = KeyEntry {
            key,
            timestamp: display_timestamp(&self.clock, &self.time_format),
            action,
        };
        self.events_recorded += 1;

        tracing::debug!(key = %entry.key, action = ?action, "Key recorded");
        if self.log.push(entry.clone()).is_some() {
            tracing::trace!("Key log full, dropped oldest entry");
        }
        Some(entry)
    }

    /// Clear the key log but keep the buffer.
    pub fn clear_logs(&mut self) {
        self.log.clear();
        tracing::debug!("Key log cleared");
    }

    /// Clear the buffer and the log. Idempotent.
    pub fn reset(&mut self) {
        self.log.clear();
        self.text.clear();
        self.previous_text.clear();
        self.events_recorded = 0;
        tracing::debug!("Key tracker reset");
    }

    pub fn log(&self) -> &BoundedLog<KeyEntry> {
        &self.log
    }

    /// Logged key events, newest first.
    pub fn entries(&self) -> Vec<KeyEntry> {
        self.log.to_vec()
    }

    /// Current buffer content.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Buffer the next change is compared against.
    pub fn previous_text(&self) -> &str {
        &self.previous_text
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Entries produced since creation or the last full reset. Unlike the
    /// log length, this survives [`clear_logs`](Self::clear_logs).
    pub fn events_recorded(&self) -> u64 {
        self.events_recorded
    }

    pub fn snapshot(&self) -> KeySnapshot {
        KeySnapshot {
            text: self.text.clone(),
            char_count: self.char_count(),
            key_events: self.log.len(),
            entries: self.entries(),
        }
    }
}
