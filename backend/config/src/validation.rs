//! Config validation with user-friendly error messages.

use thiserror::Error;
use tutorbridge_core::webhook::PLATFORM_TEXT_LIMIT;

use crate::schema::TutorConfig;

/// Seconds the voice platform waits for a webhook before giving up.
const PLATFORM_TURN_BUDGET_SECS: f64 = 4.5;

/// Deadlines above this are configuration mistakes, not slow networks.
const MAX_RESPONSE_TIMEOUT_SECS: f64 = 60.0;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &TutorConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_model(config, &mut report);
    validate_dialog(config, &mut report);
    validate_server(config, &mut report);
    report
}

fn validate_model(config: &TutorConfig, report: &mut ValidationReport) {
    let model = &config.model;
    if model.api_key.as_deref().map(str::is_empty).unwrap_or(true) {
        report.warn("model.apiKey", "No API key configured; model calls will fail");
    }
    if model.model.trim().is_empty() {
        report.error("model.model", "Model id cannot be empty");
    }
    if !(model.base_url.starts_with("http://") || model.base_url.starts_with("https://")) {
        report.error(
            "model.baseUrl",
            format!("'{}' is not an http(s) URL", model.base_url),
        );
    }
    if model.max_tokens == 0 {
        report.error("model.maxTokens", "maxTokens must be >= 1");
    }
    if !(0.0..=2.0).contains(&model.temperature) {
        report.error("model.temperature", "temperature must be within 0.0..=2.0");
    }
}

fn validate_dialog(config: &TutorConfig, report: &mut ValidationReport) {
    let dialog = &config.dialog;
    let timeout = dialog.response_timeout_secs;
    if !timeout.is_finite() || timeout <= 0.0 {
        report.error("dialog.responseTimeoutSecs", "responseTimeoutSecs must be > 0");
    } else if timeout > MAX_RESPONSE_TIMEOUT_SECS {
        report.error(
            "dialog.responseTimeoutSecs",
            format!("responseTimeoutSecs must be <= {MAX_RESPONSE_TIMEOUT_SECS}"),
        );
    } else if timeout >= PLATFORM_TURN_BUDGET_SECS {
        report.warn(
            "dialog.responseTimeoutSecs",
            format!("{timeout}s leaves no room inside the platform's {PLATFORM_TURN_BUDGET_SECS}s turn budget"),
        );
    }
    if dialog.history_depth == 0 {
        report.warn("dialog.historyDepth", "historyDepth is 0; the tutor will not remember earlier turns");
    }
    if dialog.max_text_chars == 0 {
        report.error("dialog.maxTextChars", "maxTextChars must be >= 1");
    } else if dialog.max_text_chars > PLATFORM_TEXT_LIMIT {
        report.warn(
            "dialog.maxTextChars",
            format!("replies are cut to the platform limit of {PLATFORM_TEXT_LIMIT} chars anyway"),
        );
    }
    if dialog.system_prompt.trim().is_empty() {
        report.warn("dialog.systemPrompt", "Empty system prompt");
    }
    if (dialog.pending_ttl_secs as f64) < timeout {
        report.error(
            "dialog.pendingTtlSecs",
            "pendingTtlSecs must not be shorter than responseTimeoutSecs",
        );
    }
    if dialog.sweep_interval_secs == 0 {
        report.error("dialog.sweepIntervalSecs", "sweepIntervalSecs must be >= 1");
    }
}

fn validate_server(config: &TutorConfig, report: &mut ValidationReport) {
    if let Err(e) = config.server.socket_addr() {
        report.error("server.bind", e.to_string());
    }
    if config.server.port < 1024 && config.server.port != 80 && config.server.port != 443 {
        report.warn(
            "server.port",
            format!("Port {} requires elevated privileges; consider using a port >= 1024", config.server.port),
        );
    }
}
