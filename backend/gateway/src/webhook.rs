//! Voice-platform webhook (`POST /post`, `POST /`).
//!
//! Always answers HTTP 200 with a well-formed reply body: the platform treats
//! any other status as a skill failure.

use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use tracing::{info_span, warn, Instrument};
use tutorbridge_core::{WebhookRequest, WebhookResponse};
use tutorbridge_dialog::replies;
use tutorbridge_logging::{EventLogger, TurnEvent};
use uuid::Uuid;

use crate::server::GatewayState;

/// Session id used in logs when the body could not be parsed.
const UNPARSED_SESSION: &str = "-";

/// Handler for `POST /post`.
pub async fn post_webhook(
    State(state): State<GatewayState>,
    body: Bytes,
) -> (StatusCode, Json<WebhookResponse>) {
    let turn_id = Uuid::new_v4();
    let span = info_span!("turn", %turn_id);

    let request: WebhookRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            let _guard = span.enter();
            warn!(error = %e, bytes = body.len(), "Malformed webhook body");
            EventLogger::log_turn(
                UNPARSED_SESSION,
                TurnEvent::MalformedRequest {
                    error: e.to_string(),
                },
            );
            return (
                StatusCode::OK,
                Json(WebhookResponse::detached(replies::DIDNT_HEAR)),
            );
        }
    };

    let response = state.handler.handle(&request).instrument(span).await;
    (StatusCode::OK, Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::json;
    use tutorbridge_config::{DialogSettings, TutorConfig};
    use tutorbridge_dialog::{DialogHandler, InMemorySessionStore};
    use tutorbridge_model::{MockProvider, ModelClient};

    fn state_with(mock: MockProvider) -> GatewayState {
        let config = TutorConfig::default();
        let client = ModelClient::new(Arc::new(mock), &config.model, "tutor");
        let handler = DialogHandler::new(
            client,
            Arc::new(InMemorySessionStore::new()),
            DialogSettings {
                response_timeout_secs: 1.0,
                ..config.dialog.clone()
            },
        );
        GatewayState::new(handler, config)
    }

    async fn post(state: &GatewayState, body: &str) -> (StatusCode, serde_json::Value) {
        let (status, Json(resp)) =
            post_webhook(State(state.clone()), Bytes::from(body.to_string())).await;
        (status, serde_json::to_value(resp).unwrap())
    }

    #[tokio::test]
    async fn malformed_json_gets_soft_reply() {
        let state = state_with(MockProvider::new("mock"));
        for body in ["{not json", "", "[1, 2]", "\"text\""] {
            let (status, json) = post(&state, body).await;
            assert_eq!(status, StatusCode::OK, "{body:?}");
            assert_eq!(json["response"]["text"], replies::DIDNT_HEAR);
            assert_eq!(json["response"]["end_session"], false);
            assert_eq!(json["version"], "1.0");
        }
    }

    #[tokio::test]
    async fn greeting_echoes_session() {
        let state = state_with(MockProvider::new("mock"));
        let body = json!({
            "version": "1.0",
            "session": {"session_id": "abc", "new": true, "user": {"user_id": "u1"}},
            "request": {"original_utterance": ""}
        });
        let (status, json) = post(&state, &body.to_string()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["response"]["text"], replies::GREETING);
        assert_eq!(json["session"]["user"]["user_id"], "u1");
    }

    #[tokio::test]
    async fn model_failure_is_still_http_200() {
        let state = state_with(MockProvider::new("mock").failing("401 Unauthorized"));
        let body = json!({
            "session": {"session_id": "abc", "new": false},
            "request": {"original_utterance": "how do you say hello"}
        });
        let (status, json) = post(&state, &body.to_string()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["response"]["text"], replies::APOLOGY);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_model_defers_over_http() {
        let state = state_with(
            MockProvider::new("mock")
                .with_response("Hello — это привет.")
                .with_delay(Duration::from_secs(3)),
        );
        let ask = json!({
            "session": {"session_id": "abc", "new": false},
            "request": {"original_utterance": "что такое hello по-русски"}
        });
        let (_, first) = post(&state, &ask.to_string()).await;
        assert_eq!(first["response"]["text"], replies::THINKING);

        tokio::time::sleep(Duration::from_secs(5)).await;

        let cont = json!({
            "session": {"session_id": "abc", "new": false},
            "request": {"original_utterance": "продолжи"}
        });
        let (_, second) = post(&state, &cont.to_string()).await;
        assert_eq!(second["response"]["text"], "Hello — это привет.");
    }
}
