//! Voice-platform webhook protocol.
//!
//! The inbound shape is parsed leniently: every field is optional and the
//! `session` object is kept verbatim so it can be echoed back untouched.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Protocol version used when the caller did not send one.
pub const DEFAULT_PROTOCOL_VERSION: &str = "1.0";

/// Hard limit the platform enforces on `response.text`.
pub const PLATFORM_TEXT_LIMIT: usize = 1024;

/// One inbound turn.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookRequest {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub session: Value,
    #[serde(default)]
    pub request: RequestBody,
}

/// The user-input part of a turn.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestBody {
    #[serde(default)]
    pub original_utterance: Option<String>,
}

/// Typed view over the fields of `session` the handler relies on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionInfo {
    pub is_new: bool,
    pub session_id: String,
}

impl WebhookRequest {
    pub fn version(&self) -> &str {
        self.version.as_deref().unwrap_or(DEFAULT_PROTOCOL_VERSION)
    }

    pub fn session_info(&self) -> SessionInfo {
        SessionInfo {
            is_new: self
                .session
                .get("new")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            session_id: self
                .session
                .get("session_id")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        }
    }

    pub fn utterance(&self) -> &str {
        self.request.original_utterance.as_deref().unwrap_or("")
    }
}

/// One outbound turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookResponse {
    pub version: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub session: Value,
    pub response: ResponseBody,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseBody {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tts: Option<String>,
    pub end_session: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<Button>,
}

/// Suggestion chip rendered under the reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub title: String,
    pub hide: bool,
}

impl Button {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            hide: true,
        }
    }
}

impl WebhookResponse {
    /// Reply to `request`, echoing its version and session.
    pub fn reply_to(request: &WebhookRequest, text: impl Into<String>) -> Self {
        Self {
            version: request.version().to_string(),
            session: request.session.clone(),
            response: ResponseBody {
                text: text.into(),
                ..Default::default()
            },
        }
    }

    /// Reply used when the request could not be parsed at all.
    pub fn detached(text: impl Into<String>) -> Self {
        Self {
            version: DEFAULT_PROTOCOL_VERSION.to_string(),
            session: Value::Null,
            response: ResponseBody {
                text: text.into(),
                ..Default::default()
            },
        }
    }

    pub fn end_session(mut self) -> Self {
        self.response.end_session = true;
        self
    }

    pub fn with_buttons<I, S>(mut self, titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.response.buttons = titles.into_iter().map(Button::new).collect();
        self
    }

    /// Cap `text` (and `tts`) at `max_chars` characters.
    pub fn capped(mut self, max_chars: usize) -> Self {
        let limit = max_chars.min(PLATFORM_TEXT_LIMIT);
        self.response.text = truncate_chars(&self.response.text, limit);
        if let Some(tts) = self.response.tts.take() {
            self.response.tts = Some(truncate_chars(&tts, limit));
        }
        self
    }
}

/// Truncate on a character boundary, never splitting a multi-byte char.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
