//! Append-only JSONL writer for emitted tracker entries.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use probekit_common::error::{ProbeError, ProbeResult};
use probekit_event_model::entry::LogEntry;
use probekit_event_model::event::EventStreamHeader;

/// Writes entries to a JSONL file, one per line, after a `#` header line.
pub struct EntryWriter {
    writer: BufWriter<File>,
    path: PathBuf,
    entries_written: u64,
}

impl EntryWriter {
    /// Create the file (truncating it) and write the header line.
    pub fn new(path: PathBuf, header: &EventStreamHeader) -> ProbeResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;

        let mut writer = BufWriter::new(file);

        let header_json = serde_json::to_string(header)?;
        writeln!(writer, "# {header_json}")
            .map_err(|e| ProbeError::replay(format!("Failed to write header: {e}")))?;

        Ok(Self {
            writer,
            path,
            entries_written: 0,
        })
    }

    /// Write a single entry as a JSONL line.
    pub fn write_entry(&mut self, entry: &LogEntry) -> ProbeResult<()> {
        let json = serde_json::to_string(entry)?;
        writeln!(self.writer, "{json}")
            .map_err(|e| ProbeError::replay(format!("Failed to write entry: {e}")))?;
        self.entries_written += 1;
        Ok(())
    }

    /// Flush buffered writes to disk.
    pub fn flush(&mut self) -> ProbeResult<()> {
        self.writer
            .flush()
            .map_err(|e| ProbeError::replay(format!("Failed to flush entries: {e}")))
    }

    pub fn entries_written(&self) -> u64 {
        self.entries_written
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for EntryWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

/// Read entries back from a file written by [`EntryWriter`].
pub fn read_entries(path: &Path) -> ProbeResult<Vec<LogEntry>> {
    let content = std::fs::read_to_string(path)?;
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| serde_json::from_str(line).map_err(ProbeError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use probekit_event_model::entry::{Direction, KeyAction, KeyEntry, SwipeEntry};

    #[test]
    fn test_entry_writer_roundtrip() {
        let dir = std::env::temp_dir().join("probekit_test_writer");
        let _ = std::fs::remove_dir_all(&dir);

        let path = dir.join("nested").join("entries.jsonl");
        let entries = vec![
            LogEntry::from(SwipeEntry {
                direction: Direction::Left,
                distance: 51,
                velocity: 300,
                timestamp: "10:00:00 AM".to_string(),
            }),
            LogEntry::from(KeyEntry {
                key: "q".to_string(),
                timestamp: "10:00:01 AM".to_string(),
                action: KeyAction::Added,
            }),
        ];

        {
            let mut writer = EntryWriter::new(path.clone(), &EventStreamHeader::default()).unwrap();
            for entry in &entries {
                writer.write_entry(entry).unwrap();
            }
            assert_eq!(writer.entries_written(), 2);
            assert_eq!(writer.path(), path.as_path());
        }

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.lines().next().unwrap().starts_with("# "));
        assert_eq!(read_entries(&path).unwrap(), entries);

        std::fs::remove_dir_all(&dir).ok();
    }
}
