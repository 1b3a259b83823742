//! Replay a recorded event stream and print each screen's final state.

use std::path::PathBuf;

use serde::Serialize;

use probekit_common::config::AppConfig;
use probekit_trackers::{
    load_event_file, rounded_point, ReplaySummary, Replayer, SessionSnapshot,
};

#[derive(Serialize)]
struct ReplayReport<'a> {
    description: Option<&'a str>,
    summary: ReplaySummary,
    screens: SessionSnapshot,
}

pub fn run(
    path: PathBuf,
    output: Option<PathBuf>,
    json: bool,
    config: &AppConfig,
) -> anyhow::Result<()> {
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;

    let file = load_event_file(&path)
        .map_err(|e| anyhow::anyhow!("Failed to load events: {e}"))?;
    tracing::info!(path = %path.display(), events = file.events.len(), "Loaded event stream");

    let mut replayer = Replayer::new(&file.header, config);
    if let Some(out) = output.clone() {
        replayer = replayer
            .with_output(out, &file.header)
            .map_err(|e| anyhow::anyhow!("Failed to open output: {e}"))?;
    }
    let summary = replayer
        .run(&file.events)
        .map_err(|e| anyhow::anyhow!("Replay failed: {e}"))?;
    let screens = replayer.session().snapshot();

    if json {
        let report = ReplayReport {
            description: file.header.description.as_deref(),
            summary,
            screens,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Replaying: {}", path.display());
    if let Some(description) = &file.header.description {
        println!("  {description}");
    }
    println!(
        "  {} events, {} entries, {} without an entry",
        summary.events, summary.entries, summary.silent
    );
    println!();

    print_taps(&screens);
    print_swipes(&screens);
    print_keys(&screens);

    if let Some(out) = output {
        println!("Entries written to: {}", out.display());
    }
    Ok(())
}

fn print_taps(screens: &SessionSnapshot) {
    let tap = &screens.tap;
    println!("Multi Tap");
    println!("  Tap Count: {}", tap.tap_count);
    if let Some(gap) = tap.time_between_taps_ms {
        println!("  Time Between Taps: {gap}ms");
    }
    if let Some(point) = tap.last_coordinates {
        let (x, y) = rounded_point(point);
        println!("  Last Tap: x={x}, y={y}");
    }
    println!("  Tap Log:");
    if tap.entries.is_empty() {
        println!("    No taps yet.");
    }
    for entry in &tap.entries {
        println!("    {entry}");
    }
    println!();
}

fn print_swipes(screens: &SessionSnapshot) {
    let swipe = &screens.swipe;
    println!("Multi Swipe");
    println!("  Total Swipes: {}", swipe.swipe_count);
    println!("  Recent Swipes:");
    if swipe.entries.is_empty() {
        println!("    No swipes detected yet.");
    }
    for entry in &swipe.entries {
        println!("    {entry}");
    }
    println!();
}

fn print_keys(screens: &SessionSnapshot) {
    let key = &screens.key;
    println!("Typewriter");
    println!("  Text: {:?}", key.text);
    println!("  Characters: {}", key.char_count);
    println!("  Key Events: {}", key.key_events);
    println!("  Key Input Log:");
    if key.entries.is_empty() {
        println!("    No key inputs yet.");
    }
    for entry in &key.entries {
        println!("    {entry}");
    }
    println!();
}
