//! probekit Event Model
//!
//! Defines the data contracts between the host input layer and the trackers:
//! - **Events:** what the host delivers (taps, gesture-stream updates,
//!   text-buffer changes, resets), recorded as JSONL for replay
//! - **Entries:** what the trackers produce (tap, swipe, and key log
//!   entries with their derived metrics)

pub mod entry;
pub mod event;

pub use entry::*;
pub use event::*;
