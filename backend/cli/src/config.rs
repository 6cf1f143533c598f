//! Start-up configuration: `.env`, optional YAML file, environment overrides.

use std::path::PathBuf;

use anyhow::Result;
use tutorbridge_config::{load_and_prepare, process_env, validate, TutorConfig};
use tutorbridge_logging::LogOptions;

/// Load `.env` from the working directory, if present. Variables already set
/// in the process environment win.
pub fn load_dotenv() {
    if let Ok(path) = dotenvy::dotenv() {
        // Logging is not up yet.
        eprintln!("Loaded environment from {}", path.display());
    }
}

/// Effective config for this process.
pub async fn load(path: Option<PathBuf>) -> Result<TutorConfig> {
    load_and_prepare(path.as_deref(), &process_env()).await
}

/// Logger options derived from the `logging` section.
pub fn log_options(config: &TutorConfig) -> LogOptions {
    LogOptions {
        level: config.logging.level.clone(),
        json: config.logging.json,
        dir: config.logging.dir.as_ref().map(PathBuf::from),
    }
}

/// Re-emit validation warnings once the subscriber is installed.
pub fn log_warnings(config: &TutorConfig) {
    for warning in validate(config).warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn loads_explicit_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tutor.yaml");
        std::fs::write(&path, "dialog:\n  historyDepth: 3\nlogging:\n  json: true\n  dir: /tmp/tutor-logs\n")
            .unwrap();

        let config = load(Some(path)).await.unwrap();
        assert_eq!(config.dialog.history_depth, 3);

        let options = log_options(&config);
        assert!(options.json);
        assert_eq!(options.dir, Some(PathBuf::from("/tmp/tutor-logs")));
    }
}
