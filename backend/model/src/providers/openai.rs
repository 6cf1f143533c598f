use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use tutorbridge_core::{ChatMessage, LlmProvider, LlmRequest, LlmResponse};

/// Longest slice of an error body kept in the error message.
const ERROR_BODY_LIMIT: usize = 300;

/// OpenAI-compatible chat-completion provider (`POST {base}/chat/completions`).
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiProvider {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".to_string(),
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    total_tokens: Option<u64>,
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse> {
        let start = Instant::now();

        let body = ChatRequest {
            model: &request.model,
            messages: &request.messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        debug!(
            model = %request.model,
            messages = request.messages.len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("chat completion HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            let snippet: String = error_body.chars().take(ERROR_BODY_LIMIT).collect();
            anyhow::bail!("chat completion returned {}: {}", status, snippet);
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .context("Failed to parse chat completion response")?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        let tokens_used = chat_response
            .usage
            .and_then(|u| u.total_tokens)
            .unwrap_or(0);

        Ok(LlmResponse {
            content,
            provider: "openai".to_string(),
            model: request.model.clone(),
            tokens_used,
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};
    use tokio::net::TcpListener;

    async fn serve(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/v1")
    }

    fn request() -> LlmRequest {
        LlmRequest {
            model: "gpt-4o-mini".into(),
            messages: vec![ChatMessage::system("be brief"), ChatMessage::user("cat?")],
            max_tokens: 160,
            temperature: 0.6,
        }
    }

    #[tokio::test]
    async fn parses_first_choice() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["model"], "gpt-4o-mini");
                assert_eq!(body["messages"][1]["role"], "user");
                assert_eq!(body["max_tokens"], 160);
                Json(json!({
                    "choices": [{"message": {"role": "assistant", "content": "Cat is кошка."}}],
                    "usage": {"total_tokens": 42}
                }))
            }),
        );
        let base = serve(router).await;
        let provider = OpenAiProvider::new("sk-test", Duration::from_secs(5))
            .unwrap()
            .with_base_url(base);

        let resp = provider.complete(&request()).await.unwrap();
        assert_eq!(resp.content, "Cat is кошка.");
        assert_eq!(resp.tokens_used, 42);
        assert_eq!(resp.provider, "openai");
    }

    #[tokio::test]
    async fn non_success_status_is_error() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|| async { (StatusCode::UNAUTHORIZED, "invalid_api_key") }),
        );
        let base = serve(router).await;
        let provider = OpenAiProvider::new("bad", Duration::from_secs(5))
            .unwrap()
            .with_base_url(base);

        let err = provider.complete(&request()).await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("401"), "{msg}");
        assert!(msg.contains("invalid_api_key"), "{msg}");
    }

    #[tokio::test]
    async fn null_content_becomes_empty() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|| async { Json(json!({"choices": [{"message": {"content": null}}]})) }),
        );
        let base = serve(router).await;
        let provider = OpenAiProvider::new("k", Duration::from_secs(5))
            .unwrap()
            .with_base_url(base);
        assert_eq!(provider.complete(&request()).await.unwrap().content, "");
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let provider = OpenAiProvider::new("k", Duration::from_secs(1))
            .unwrap()
            .with_base_url("http://localhost:1234/v1/");
        assert_eq!(provider.endpoint(), "http://localhost:1234/v1/chat/completions");
    }
}
