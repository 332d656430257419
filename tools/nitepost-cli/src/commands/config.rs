//! Show or write the effective configuration.

use nitepost_common::AppConfig;

pub fn run(write: bool, config: &AppConfig) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(config)?);
    if write {
        config.save()?;
        println!("Configuration written to {}", AppConfig::default_path().display());
    }
    Ok(())
}
