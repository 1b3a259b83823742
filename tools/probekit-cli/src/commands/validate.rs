//! Validate a recorded event stream.

use std::path::PathBuf;

use probekit_event_model::event::{EventKind, TapKind, SCHEMA_VERSION};
use probekit_trackers::load_event_file;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    println!("Validating event stream at: {}", path.display());

    let file =
        load_event_file(&path).map_err(|e| anyhow::anyhow!("Failed to load events: {e}"))?;

    if file.has_header {
        println!("  Schema: {}", file.header.schema_version);
        println!("  Epoch: {} ms", file.header.epoch_ms);
    } else {
        println!("  Header: none (epoch defaults to 0)");
    }
    println!("  Events: {}", file.events.len());

    let mut issues = Vec::new();
    if file.has_header && file.header.schema_version != SCHEMA_VERSION {
        issues.push(format!(
            "schema version {} (expected {SCHEMA_VERSION})",
            file.header.schema_version
        ));
    }

    let mut prev = None;
    for (idx, event) in file.events.iter().enumerate() {
        if let Some(prev) = prev {
            if event.offset_ms < prev {
                issues.push(format!(
                    "event {}: t={} goes back in time (previous t={prev})",
                    idx + 1,
                    event.offset_ms
                ));
            }
        }
        prev = Some(event.offset_ms);

        if let EventKind::Tap {
            source: TapKind::Screen,
            ..
        } = event.kind
        {
            if event.tap_position().is_none() {
                issues.push(format!("event {}: screen tap without coordinates", idx + 1));
            }
        }
    }

    if issues.is_empty() {
        println!("\nEvent stream is valid.");
    } else {
        println!("\nValidation issues:");
        for issue in &issues {
            println!("  - {issue}");
        }
        println!(
            "\n{} issue(s) found. Replay may not match the recorded session.",
            issues.len()
        );
    }

    Ok(())
}
