//! Health and config endpoints.

use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;
use tutorbridge_config::mask_secret;

use crate::server::GatewayState;

pub const SERVICE_NAME: &str = "tutorbridge";

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: String,
    pub service: String,
    pub version: String,
    pub uptime_seconds: u64,
    /// Sessions with stored state.
    pub sessions: usize,
    /// Deferred answers not yet collected.
    pub pending: usize,
}

/// Handler for `GET /health`
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthReport> {
    let uptime = (Utc::now() - state.started_at).num_seconds().max(0) as u64;
    Json(HealthReport {
        status: "ok".into(),
        service: SERVICE_NAME.into(),
        version: env!("CARGO_PKG_VERSION").into(),
        uptime_seconds: uptime,
        sessions: state.handler.store().len().await,
        pending: state.handler.pending().len().await,
    })
}

/// Public view of the effective settings. The API key is never shown in full.
#[derive(Debug, Serialize)]
pub struct ConfigReport {
    pub provider: String,
    pub model: String,
    pub base_url: String,
    pub api_key: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_seconds: f64,
    pub history_depth: usize,
    pub max_text_chars: usize,
}

/// Handler for `GET /config`
pub async fn get_config(State(state): State<GatewayState>) -> Json<ConfigReport> {
    let config = &state.config;
    let dialog = state.handler.settings();
    Json(ConfigReport {
        provider: state.handler.model().provider_name().to_string(),
        model: state.handler.model().model().to_string(),
        base_url: config.model.base_url.clone(),
        api_key: config.model.api_key.as_deref().map(mask_secret),
        max_tokens: config.model.max_tokens,
        temperature: config.model.temperature,
        timeout_seconds: dialog.response_timeout_secs,
        history_depth: dialog.history_depth,
        max_text_chars: dialog.max_text_chars,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use tutorbridge_config::TutorConfig;
    use tutorbridge_dialog::{DialogHandler, InMemorySessionStore};
    use tutorbridge_model::{MockProvider, ModelClient};

    fn state(config: TutorConfig) -> GatewayState {
        let client = ModelClient::new(Arc::new(MockProvider::new("mock")), &config.model, "tutor");
        let handler = DialogHandler::new(
            client,
            Arc::new(InMemorySessionStore::new()),
            config.dialog.clone(),
        );
        GatewayState::new(handler, config)
    }

    #[tokio::test]
    async fn health_reports_counts() {
        let Json(report) = get_health(State(state(TutorConfig::default()))).await;
        assert_eq!(report.status, "ok");
        assert_eq!(report.service, "tutorbridge");
        assert_eq!(report.sessions, 0);
        assert_eq!(report.pending, 0);
    }

    #[tokio::test]
    async fn config_masks_api_key() {
        let mut config = TutorConfig::default();
        config.model.api_key = Some("sk-live-0123456789abcdef".into());
        let Json(report) = get_config(State(state(config))).await;

        assert_eq!(report.api_key.as_deref(), Some("sk-l***"));
        assert_eq!(report.provider, "mock");
        assert_eq!(report.model, "gpt-4o-mini");
        assert_eq!(report.history_depth, 6);
        assert_eq!(report.max_text_chars, 350);

        let json = serde_json::to_string(&report).unwrap();
        assert!(!json.contains("0123456789abcdef"));
    }
}
