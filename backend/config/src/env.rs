//! Environment handling for config.
//!
//! Two jobs:
//! - `${VAR_NAME}` substitution inside the YAML file text, resolved at load
//!   time (`$${VAR}` escapes to a literal `${VAR}`);
//! - plain environment overrides (`OPENAI_MODEL`, `TIMEOUT_SECONDS`, ...) laid
//!   over whatever the file or the defaults produced.

use anyhow::{bail, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::str::FromStr;
use tracing::warn;

use crate::schema::TutorConfig;

/// `${NAME}` references, optionally preceded by an escaping `$`.
static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\$?)\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

/// Error returned for missing env vars.
#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced on config line {line}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub line: usize,
}

/// Snapshot of the process environment.
pub fn process_env() -> HashMap<String, String> {
    std::env::vars().collect()
}

/// Substitute `${VAR}` references in raw config text.
///
/// Fails on the first reference to an unset or empty variable.
pub fn substitute_env_vars(text: &str, env: &HashMap<String, String>) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    for (idx, line) in text.split_inclusive('\n').enumerate() {
        let mut missing: Option<MissingEnvVarError> = None;
        let replaced = ENV_VAR_PATTERN.replace_all(line, |caps: &regex::Captures| {
            let name = &caps[2];
            if !caps[1].is_empty() {
                return format!("${{{name}}}");
            }
            match env.get(name) {
                Some(val) if !val.is_empty() => val.clone(),
                _ => {
                    if missing.is_none() {
                        missing = Some(MissingEnvVarError {
                            var_name: name.to_string(),
                            line: idx + 1,
                        });
                    }
                    String::new()
                }
            }
        });
        if let Some(err) = missing {
            bail!(err);
        }
        out.push_str(&replaced);
    }
    Ok(out)
}

/// Collect all env var names referenced in config text (for diagnostics).
pub fn collect_referenced_vars(text: &str) -> Vec<String> {
    let mut vars: Vec<String> = ENV_VAR_PATTERN
        .captures_iter(text)
        .filter(|caps| caps[1].is_empty())
        .map(|caps| caps[2].to_string())
        .collect();
    vars.sort();
    vars.dedup();
    vars
}

/// Lay environment overrides over `config`.
///
/// Unset or empty variables leave the field alone. Values that fail to parse
/// are ignored with a warning so a typo never prevents start-up.
pub fn apply_env_overrides(mut config: TutorConfig, env: &HashMap<String, String>) -> TutorConfig {
    let get = |key: &str| env.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

    if let Some(key) = get("OPENAI_API_KEY") {
        config.model.api_key = Some(key.to_string());
    }
    if let Some(url) = get("OPENAI_BASE_URL") {
        config.model.base_url = url.trim_end_matches('/').to_string();
    }
    if let Some(model) = get("OPENAI_MODEL").or_else(|| get("MODEL")) {
        config.model.model = model.to_string();
    }
    override_parsed(&mut config.model.max_tokens, get("MAX_TOKENS"), "MAX_TOKENS");
    override_parsed(&mut config.model.temperature, get("TEMPERATURE"), "TEMPERATURE");
    override_parsed(
        &mut config.model.request_timeout_secs,
        get("OPENAI_TIMEOUT_SECONDS"),
        "OPENAI_TIMEOUT_SECONDS",
    );

    override_parsed(
        &mut config.dialog.response_timeout_secs,
        get("TIMEOUT_SECONDS"),
        "TIMEOUT_SECONDS",
    );
    override_parsed(&mut config.dialog.history_depth, get("HISTORY_DEPTH"), "HISTORY_DEPTH");
    override_parsed(&mut config.dialog.max_text_chars, get("MAX_TEXT_CHARS"), "MAX_TEXT_CHARS");
    override_parsed(
        &mut config.dialog.pending_ttl_secs,
        get("PENDING_TTL_SECONDS"),
        "PENDING_TTL_SECONDS",
    );
    // Prompts keep their inner whitespace; only emptiness is checked.
    if let Some(prompt) = env.get("SYSTEM_PROMPT").filter(|v| !v.trim().is_empty()) {
        config.dialog.system_prompt = prompt.clone();
    }
    if let Some(style) = env.get("ANSWER_STYLE").filter(|v| !v.trim().is_empty()) {
        config.dialog.answer_style = style.clone();
    }

    if let Some(bind) = get("TUTOR_BIND") {
        config.server.bind = bind.to_string();
    }
    override_parsed(&mut config.server.port, get("PORT"), "PORT");

    if let Some(level) = get("TUTOR_LOG_LEVEL") {
        config.logging.level = level.to_string();
    }
    if let Some(dir) = get("TUTOR_LOG_DIR") {
        config.logging.dir = Some(dir.to_string());
    }
    if let Some(json) = get("TUTOR_LOG_JSON") {
        config.logging.json = matches!(json.to_ascii_lowercase().as_str(), "1" | "true" | "yes");
    }

    config
}

fn override_parsed<T: FromStr>(slot: &mut T, raw: Option<&str>, var: &str) {
    let Some(raw) = raw else { return };
    match raw.parse::<T>() {
        Ok(value) => *slot = value,
        Err(_) => warn!(var, value = raw, "Ignoring unparseable environment override"),
    }
}
