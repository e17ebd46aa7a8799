//! Config loader — reads `~/.diagramgen/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.diagramgen/config.json`
//! 3. Plain variables: `DEEPSEEK_API_KEY`, `GEMINI_API_KEY`, `PORT`
//! 4. Namespaced variables `DIAGRAMGEN_<SECTION>__<FIELD>` (override everything)
//!
//! A `.env` file in the working directory is merged into the process
//! environment by [`load_dotenv`] before any of this runs.

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::{Config, ProviderConfig};

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Merge a `.env` file into the process environment, if one exists.
///
/// Variables already set in the environment win over the file.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => warn!("Failed to load .env file: {}", e),
    }
}

/// Load configuration from the default path + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    let config = load_config_from_path(&config_path);
    apply_env_overrides(config, |key| std::env::var(key).ok())
}

/// Load config from a specific file path, without env overrides.
fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return Config::default();
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return Config::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to parse config JSON: {}", e);
            Config::default()
        }
    }
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config).map_err(std::io::Error::other)?;

    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Apply environment variable overrides on top of a loaded config.
///
/// `lookup` resolves a variable name to its value; production passes
/// `std::env::var`, tests pass a map.
///
/// Supported overrides:
/// - `DEEPSEEK_API_KEY`, `GEMINI_API_KEY` → `providers.<name>.api_key`
/// - `PORT` → `server.port`
/// - `DIAGRAMGEN_PROVIDERS__<NAME>__API_KEY` → `providers.<name>.api_key`
/// - `DIAGRAMGEN_PROVIDERS__<NAME>__API_BASE` → `providers.<name>.api_base`
/// - `DIAGRAMGEN_PROVIDERS__<NAME>__MODEL` → `providers.<name>.model`
/// - `DIAGRAMGEN_SERVER__HOST` → `server.host`
/// - `DIAGRAMGEN_SERVER__PORT` → `server.port`
fn apply_env_overrides<F>(mut config: Config, lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    apply_provider_env(&mut config.providers.deepseek, "DEEPSEEK", &lookup);
    apply_provider_env(&mut config.providers.gemini, "GEMINI", &lookup);

    if let Some(val) = lookup("PORT") {
        match val.parse::<u16>() {
            Ok(p) => config.server.port = p,
            Err(_) => warn!("Ignoring invalid PORT value: {}", val),
        }
    }

    if let Some(val) = lookup("DIAGRAMGEN_SERVER__HOST") {
        config.server.host = val;
    }
    if let Some(val) = lookup("DIAGRAMGEN_SERVER__PORT") {
        match val.parse::<u16>() {
            Ok(p) => config.server.port = p,
            Err(_) => warn!("Ignoring invalid DIAGRAMGEN_SERVER__PORT value: {}", val),
        }
    }

    config
}

/// Apply env var overrides for a single provider.
fn apply_provider_env<F>(provider: &mut ProviderConfig, name: &str, lookup: &F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup(&format!("{name}_API_KEY")) {
        provider.api_key = val;
    }
    if let Some(val) = lookup(&format!("DIAGRAMGEN_PROVIDERS__{name}__API_KEY")) {
        provider.api_key = val;
    }
    if let Some(val) = lookup(&format!("DIAGRAMGEN_PROVIDERS__{name}__API_BASE")) {
        provider.api_base = Some(val);
    }
    if let Some(val) = lookup(&format!("DIAGRAMGEN_PROVIDERS__{name}__MODEL")) {
        provider.model = Some(val);
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
