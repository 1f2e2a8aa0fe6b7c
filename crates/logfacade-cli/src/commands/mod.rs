//! CLI commands

pub mod emit;
pub mod pipe;

use logfacade::Config;
use serde::Deserialize;
use std::path::Path;

/// Application config file; only the `logging` section is read
#[derive(Debug, Default, Deserialize)]
struct AppConfig {
    #[serde(default)]
    logging: Config,
}

/// Load the logging section of `path`
fn load_config(path: &Path) -> Result<Config, Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read config {}: {}", path.display(), e))?;
    let app: AppConfig = serde_json::from_str(&raw)
        .map_err(|e| format!("invalid config {}: {}", path.display(), e))?;
    Ok(app.logging)
}

/// Set up the process-wide logger from `path`, or with defaults when absent
pub fn configure(path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };
    logfacade::global::setup(&config)?;
    Ok(())
}
