//! tutorbridge configuration schema.
//!
//! Every section deserializes from YAML with camelCase keys and falls back to
//! the values in [`crate::defaults`] for anything left out.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

use crate::defaults::DEFAULT_RESPONSE_TIMEOUT_SECS;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TutorConfig {
    /// Upstream chat-completion settings
    pub model: ModelSettings,

    /// Turn handling: deadline, history, canned texts
    pub dialog: DialogSettings,

    /// HTTP listener
    pub server: ServerSettings,

    /// Log output
    pub logging: LoggingSettings,
}

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelSettings {
    /// Bearer token for the chat-completion API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Base URL of an OpenAI-compatible API, without the trailing path.
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Per-request HTTP timeout for the upstream call, in seconds.
    pub request_timeout_secs: u64,
}

// ---------------------------------------------------------------------------
// Dialog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DialogSettings {
    /// How long a turn waits for the model before answering with a placeholder.
    pub response_timeout_secs: f64,
    /// Number of history entries kept per session.
    pub history_depth: usize,
    pub system_prompt: String,
    /// Appended to the system prompt to keep answers short.
    pub answer_style: String,
    /// Cap on `response.text`.
    pub max_text_chars: usize,
    /// Age after which an unclaimed pending answer is dropped.
    pub pending_ttl_secs: u64,
    /// How often the pending-answer reaper runs.
    pub sweep_interval_secs: u64,
}

impl DialogSettings {
    /// Turn deadline. Values that are not a positive, representable number of
    /// seconds fall back to the default.
    pub fn response_timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.response_timeout_secs)
            .ok()
            .filter(|d| !d.is_zero())
            .unwrap_or_else(|| Duration::from_secs_f64(DEFAULT_RESPONSE_TIMEOUT_SECS))
    }

    pub fn pending_ttl(&self) -> Duration {
        Duration::from_secs(self.pending_ttl_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }

    /// System message sent ahead of every model call.
    pub fn system_message(&self) -> String {
        if self.answer_style.trim().is_empty() {
            self.system_prompt.clone()
        } else {
            format!("{}\n\n{}", self.system_prompt.trim_end(), self.answer_style)
        }
    }
}

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerSettings {
    pub bind: String,
    pub port: u16,
}

impl ServerSettings {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.bind, self.port);
        addr.parse()
            .map_err(|e| anyhow::anyhow!("invalid listen address {addr}: {e}"))
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Filter used when `RUST_LOG` is unset.
    pub level: String,
    /// Emit JSON lines on the console instead of human-readable output.
    pub json: bool,
    /// Directory for daily-rolling log files; console only when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let yaml = "dialog:\n  historyDepth: 10\nserver:\n  port: 9000\n";
        let cfg: TutorConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.dialog.history_depth, 10);
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.model, ModelSettings::default());
        assert_eq!(cfg.dialog.max_text_chars, DialogSettings::default().max_text_chars);
    }

    #[test]
    fn response_timeout_from_fractional_seconds() {
        let dialog = DialogSettings {
            response_timeout_secs: 2.2,
            ..Default::default()
        };
        assert_eq!(dialog.response_timeout(), Duration::from_millis(2200));
    }

    #[test]
    fn unrepresentable_response_timeout_falls_back_to_default() {
        let default = DialogSettings::default().response_timeout();
        for secs in [1e20, f64::NAN, f64::INFINITY, -1.0, 0.0] {
            let dialog = DialogSettings {
                response_timeout_secs: secs,
                ..Default::default()
            };
            assert_eq!(dialog.response_timeout(), default, "{secs}");
        }
    }

    #[test]
    fn system_message_joins_answer_style() {
        let dialog = DialogSettings {
            system_prompt: "You are a tutor.".into(),
            answer_style: "Be brief.".into(),
            ..Default::default()
        };
        assert_eq!(dialog.system_message(), "You are a tutor.\n\nBe brief.");

        let bare = DialogSettings {
            answer_style: "  ".into(),
            ..dialog
        };
        assert_eq!(bare.system_message(), "You are a tutor.");
    }

    #[test]
    fn socket_addr_rejects_garbage() {
        let server = ServerSettings {
            bind: "not an ip".into(),
            port: 80,
        };
        assert!(server.socket_addr().is_err());
    }
}
