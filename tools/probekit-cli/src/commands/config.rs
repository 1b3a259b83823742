//! Show or initialize the configuration.

use probekit_common::config::{config_file_path, AppConfig};

pub fn run(init: bool, config: &AppConfig) -> anyhow::Result<()> {
    if init {
        let path = AppConfig::default()
            .save()
            .map_err(|e| anyhow::anyhow!("Failed to write config: {e}"))?;
        println!("Wrote default config to: {}", path.display());
        return Ok(());
    }

    let path = config_file_path();
    if path.exists() {
        println!("# {}", path.display());
    } else {
        println!("# {} (not found, using defaults)", path.display());
    }
    println!("{}", serde_json::to_string_pretty(config)?);

    if let Err(e) = config.validate() {
        println!("\n[WARN] {e}");
    }
    Ok(())
}
