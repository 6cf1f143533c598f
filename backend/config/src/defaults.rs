//! Config defaults: the values used when neither the config file nor the
//! environment sets a field.

use crate::schema::{DialogSettings, LoggingSettings, ModelSettings, ServerSettings};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default max tokens for model responses. Answers are spoken aloud, so short.
pub const DEFAULT_MAX_TOKENS: u32 = 160;

pub const DEFAULT_TEMPERATURE: f32 = 0.6;

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default wait for the model before a placeholder is returned. The platform
/// gives a skill roughly 3 seconds per turn.
pub const DEFAULT_RESPONSE_TIMEOUT_SECS: f64 = 2.2;

pub const DEFAULT_HISTORY_DEPTH: usize = 6;

pub const DEFAULT_MAX_TEXT_CHARS: usize = 350;

pub const DEFAULT_PENDING_TTL_SECS: u64 = 300;

pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 30;

pub const DEFAULT_BIND: &str = "0.0.0.0";

pub const DEFAULT_PORT: u16 = 8080;

pub const DEFAULT_LOG_LEVEL: &str = "info";

pub const DEFAULT_SYSTEM_PROMPT: &str = "Ты — добрый учитель английского для детей 6–10 лет. \
Говори очень кратко и понятно (1–2 предложения), без длинных списков и преамбул.";

pub const DEFAULT_ANSWER_STYLE: &str =
    "Ответь максимально кратко: 1–2 предложения, простыми словами.";

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Default for DialogSettings {
    fn default() -> Self {
        Self {
            response_timeout_secs: DEFAULT_RESPONSE_TIMEOUT_SECS,
            history_depth: DEFAULT_HISTORY_DEPTH,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            answer_style: DEFAULT_ANSWER_STYLE.to_string(),
            max_text_chars: DEFAULT_MAX_TEXT_CHARS,
            pending_ttl_secs: DEFAULT_PENDING_TTL_SECS,
            sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            json: false,
            dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::schema::TutorConfig;

    use super::*;

    #[test]
    fn default_config_uses_constants() {
        let cfg = TutorConfig::default();
        assert_eq!(cfg.model.model, DEFAULT_MODEL);
        assert_eq!(cfg.model.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(cfg.dialog.history_depth, DEFAULT_HISTORY_DEPTH);
        assert_eq!(cfg.server.port, DEFAULT_PORT);
        assert!(cfg.model.api_key.is_none());
    }
}
