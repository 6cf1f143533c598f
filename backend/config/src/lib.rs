//! `tutorbridge-config`: runtime configuration for the tutor skill.
//!
//! Provides:
//! - Typed config schema (model, dialog, server, logging)
//! - Optional YAML file with `${ENV_VAR}` substitution
//! - Environment overrides (`OPENAI_MODEL`, `TIMEOUT_SECONDS`, ...)
//! - Config redaction for safe logging/display
//! - Validation with errors and warnings

pub mod defaults;
pub mod env;
pub mod io;
pub mod redact;
pub mod schema;
pub mod validation;

pub use env::{apply_env_overrides, process_env, substitute_env_vars, MissingEnvVarError};
pub use io::{load_config, parse_config, CONFIG_PATH_VAR};
pub use redact::{mask_secret, redact, redacted_config};
pub use schema::{DialogSettings, LoggingSettings, ModelSettings, ServerSettings, TutorConfig};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Load the file (if any), apply env overrides and validate.
///
/// This is the main entry point for loading a config at runtime. Validation
/// warnings are logged; errors abort.
pub async fn load_and_prepare(
    path: Option<&Path>,
    env: &HashMap<String, String>,
) -> Result<TutorConfig> {
    let path: Option<PathBuf> = path
        .map(Path::to_path_buf)
        .or_else(|| env.get(CONFIG_PATH_VAR).map(PathBuf::from));

    let config = match &path {
        Some(path) => load_config(path, env).await?,
        None => TutorConfig::default(),
    };
    let config = apply_env_overrides(config, env);

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    if let Some(first) = report.errors.first() {
        bail!("invalid configuration ({} errors), first: {first}", report.errors.len());
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn env_overrides_win_over_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "model:\n  model: from-file\n  maxTokens: 99").unwrap();

        let env: HashMap<String, String> = [
            ("OPENAI_MODEL".to_string(), "from-env".to_string()),
            ("OPENAI_API_KEY".to_string(), "sk-123".to_string()),
        ]
        .into();
        let cfg = load_and_prepare(Some(file.path()), &env).await.unwrap();
        assert_eq!(cfg.model.model, "from-env");
        assert_eq!(cfg.model.max_tokens, 99);
    }

    #[tokio::test]
    async fn config_path_can_come_from_env() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "dialog:\n  historyDepth: 2").unwrap();
        let env: HashMap<String, String> = [(
            CONFIG_PATH_VAR.to_string(),
            file.path().display().to_string(),
        )]
        .into();
        let cfg = load_and_prepare(None, &env).await.unwrap();
        assert_eq!(cfg.dialog.history_depth, 2);
    }

    #[tokio::test]
    async fn invalid_config_is_rejected() {
        let env: HashMap<String, String> = [("MAX_TOKENS".to_string(), "0".to_string())].into();
        assert!(load_and_prepare(None, &env).await.is_err());
    }
}
