use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};
use tutorbridge_config::{ModelSettings, TutorConfig};
use tutorbridge_core::{ChatMessage, LlmProvider, LlmRequest, Role, TutorError};

use crate::providers::provider_from_settings;

/// Returned when the model produced nothing but whitespace.
pub const EMPTY_ANSWER_FALLBACK: &str = "Готово.";

/// What to ask the model.
#[derive(Debug, Clone, PartialEq)]
pub enum Prompt {
    /// A single user question.
    Text(String),
    /// A role-tagged conversation, oldest first.
    Messages(Vec<ChatMessage>),
}

impl From<&str> for Prompt {
    fn from(text: &str) -> Self {
        Prompt::Text(text.to_string())
    }
}

impl From<String> for Prompt {
    fn from(text: String) -> Self {
        Prompt::Text(text)
    }
}

impl From<Vec<ChatMessage>> for Prompt {
    fn from(messages: Vec<ChatMessage>) -> Self {
        Prompt::Messages(messages)
    }
}

impl Prompt {
    /// Expand into the message list sent upstream. The system prompt is
    /// prepended unless the conversation already starts with one.
    pub fn into_messages(self, system_prompt: &str) -> Vec<ChatMessage> {
        let mut messages = match self {
            Prompt::Text(text) => vec![ChatMessage::user(text)],
            Prompt::Messages(messages) => messages,
        };
        let has_system = messages.first().map(|m| m.role == Role::System).unwrap_or(false);
        if !has_system && !system_prompt.trim().is_empty() {
            messages.insert(0, ChatMessage::system(system_prompt));
        }
        messages
    }
}

/// Chat-completion client with generation parameters fixed at construction.
///
/// Cheap to clone; clones share the underlying provider.
#[derive(Clone)]
pub struct ModelClient {
    provider: Arc<dyn LlmProvider>,
    model: String,
    max_tokens: u32,
    temperature: f32,
    system_prompt: String,
}

impl ModelClient {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        settings: &ModelSettings,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
            system_prompt: system_prompt.into(),
        }
    }

    /// Client talking to the configured OpenAI-compatible endpoint.
    pub fn from_config(config: &TutorConfig) -> anyhow::Result<Self> {
        let provider = provider_from_settings(&config.model)?;
        Ok(Self::new(provider, &config.model, config.dialog.system_message()))
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Ask the model and return its trimmed answer.
    pub async fn complete(&self, prompt: impl Into<Prompt>) -> Result<String, TutorError> {
        let request = LlmRequest {
            model: self.model.clone(),
            messages: prompt.into().into_messages(&self.system_prompt),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let start = Instant::now();
        let response = self.provider.complete(&request).await.map_err(|e| {
            warn!(provider = self.provider.name(), error = %e, "Model call failed");
            TutorError::upstream(self.provider.name(), format!("{e:#}"))
        })?;

        debug!(
            provider = %response.provider,
            model = %response.model,
            tokens = response.tokens_used,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Model answered"
        );

        let answer = response.content.trim();
        if answer.is_empty() {
            Ok(EMPTY_ANSWER_FALLBACK.to_string())
        } else {
            Ok(answer.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::mock::MockProvider;

    fn client(provider: Arc<MockProvider>) -> ModelClient {
        let settings = ModelSettings {
            model: "test-model".into(),
            max_tokens: 77,
            temperature: 0.3,
            ..Default::default()
        };
        ModelClient::new(provider, &settings, "You are a tutor.")
    }

    #[tokio::test]
    async fn text_prompt_gets_system_message_and_params() {
        let mock = Arc::new(MockProvider::new("mock").with_response("  Dog is собака.  "));
        let answer = client(mock.clone()).complete("what is dog").await.unwrap();
        assert_eq!(answer, "Dog is собака.");

        let req = mock.last_request().unwrap();
        assert_eq!(req.model, "test-model");
        assert_eq!(req.max_tokens, 77);
        assert_eq!(req.temperature, 0.3);
        assert_eq!(
            req.messages,
            vec![
                ChatMessage::system("You are a tutor."),
                ChatMessage::user("what is dog")
            ]
        );
    }

    #[tokio::test]
    async fn existing_system_message_is_kept() {
        let mock = Arc::new(MockProvider::new("mock"));
        let history = vec![
            ChatMessage::system("custom"),
            ChatMessage::user("hi"),
            ChatMessage::assistant("hello"),
            ChatMessage::user("cat?"),
        ];
        client(mock.clone()).complete(history.clone()).await.unwrap();
        assert_eq!(mock.last_request().unwrap().messages, history);
    }

    #[tokio::test]
    async fn empty_answer_uses_fallback() {
        let mock = Arc::new(MockProvider::new("mock").with_response("   "));
        let answer = client(mock).complete("x").await.unwrap();
        assert_eq!(answer, EMPTY_ANSWER_FALLBACK);
    }

    #[tokio::test]
    async fn provider_failure_maps_to_upstream_error() {
        let mock = Arc::new(MockProvider::new("mock").failing("quota exceeded"));
        let err = client(mock).complete("x").await.unwrap_err();
        match err {
            TutorError::Upstream { provider, message } => {
                assert_eq!(provider, "mock");
                assert!(message.contains("quota exceeded"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn blank_system_prompt_is_not_sent() {
        let messages = Prompt::from("hi").into_messages("  ");
        assert_eq!(messages, vec![ChatMessage::user("hi")]);
    }
}
