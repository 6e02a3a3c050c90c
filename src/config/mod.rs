pub mod schema;

pub use schema::GameNerdConfig;

use anyhow::{Context, Result};
use std::path::Path;
use thiserror::Error;

/// Environment variable holding the upstream API credential.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("OPENAI_API_KEY is not set; the service cannot start without an API credential")]
    MissingApiKey,
}

/// Load config from the given path, or return defaults.
pub fn load_config(path: &Path) -> Result<GameNerdConfig> {
    if path.exists() {
        let contents =
            std::fs::read_to_string(path).context("Failed to read gamenerd config file")?;
        let config: GameNerdConfig =
            toml::from_str(&contents).context("Failed to parse gamenerd config (TOML)")?;
        Ok(config)
    } else {
        Ok(GameNerdConfig::default())
    }
}

/// Save config to the given path (TOML format).
pub fn save_config(config: &GameNerdConfig, path: &Path) -> Result<()> {
    let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents).context("Failed to write config file")?;
    Ok(())
}

/// Read the API credential once at startup, after loading any `.env` file.
pub fn load_api_key() -> Result<String, ConfigError> {
    // A missing .env file is normal in production.
    let _ = dotenvy::dotenv();
    api_key_from(std::env::var(API_KEY_ENV).ok())
}

fn api_key_from(value: Option<String>) -> Result<String, ConfigError> {
    match value {
        Some(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
        _ => Err(ConfigError::MissingApiKey),
    }
}
