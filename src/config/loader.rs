// Configuration loader
// Loads settings from ~/.sanctum/config.toml with environment overrides

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use super::settings::Config;

/// Load configuration.
///
/// Order: defaults, then `~/.sanctum/config.toml` if present, then the
/// `SANCTUM_BIND` environment variable.
pub fn load_config() -> Result<Config> {
    let mut config = match config_path() {
        Some(path) if path.exists() => {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        }
        _ => Config::default(),
    };

    if let Ok(bind) = std::env::var("SANCTUM_BIND") {
        if !bind.is_empty() {
            config.bind_address = bind;
        }
    }

    Ok(config)
}

fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".sanctum/config.toml"))
}
