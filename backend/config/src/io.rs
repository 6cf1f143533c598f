//! Config file loading.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

use crate::env::substitute_env_vars;
use crate::schema::TutorConfig;

/// Env var naming an optional YAML config file.
pub const CONFIG_PATH_VAR: &str = "TUTOR_CONFIG";

/// Load and parse a YAML config file, resolving `${VAR}` references first.
///
/// Returns `Ok(Default::default())` if the file doesn't exist.
pub async fn load_config(path: &Path, env: &HashMap<String, String>) -> Result<TutorConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(TutorConfig::default());
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let text = substitute_env_vars(&raw, env)
        .with_context(|| format!("Failed to resolve env vars in: {}", path.display()))?;

    let config = parse_config(&text)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;

    info!(path = %path.display(), "Loaded config");
    Ok(config)
}

/// Parse config YAML. An empty document yields the defaults.
pub fn parse_config(text: &str) -> Result<TutorConfig> {
    if text.trim().is_empty() {
        return Ok(TutorConfig::default());
    }
    Ok(serde_yaml::from_str(text)?)
}

/// Render a config as YAML (used by `tutorbridge config`).
pub fn to_yaml(value: &serde_json::Value) -> Result<String> {
    serde_yaml::to_string(value).context("Failed to serialize config to YAML")
}
