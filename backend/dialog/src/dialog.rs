//! The per-turn state machine.
//!
//! Order of checks for one turn: greeting, empty utterance, fast commands,
//! a pending answer from an earlier turn, then a new model call bounded by
//! the response deadline.

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use tokio::time::Instant;
use tracing::{error, info, instrument, warn};
use tutorbridge_config::DialogSettings;
use tutorbridge_core::{ChatMessage, WebhookRequest, WebhookResponse};
use tutorbridge_logging::{EventLogger, TurnEvent};
use tutorbridge_model::{ModelClient, Prompt};

use crate::detection::{detect_command, parse_utterance};
use crate::handlers::scripted_reply;
use crate::pending::{Collected, PendingAnswers, PendingState};
use crate::replies;
use crate::store::{SessionState, SessionStore};
use crate::types::{FastCommand, Utterance};

/// Session id used when the caller sent none.
pub const ANONYMOUS_SESSION: &str = "anonymous";

/// Turns one inbound webhook call into one outbound reply.
#[derive(Clone)]
pub struct DialogHandler {
    model: ModelClient,
    store: Arc<dyn SessionStore>,
    pending: PendingAnswers,
    settings: DialogSettings,
}

impl DialogHandler {
    pub fn new(model: ModelClient, store: Arc<dyn SessionStore>, settings: DialogSettings) -> Self {
        Self {
            model,
            store,
            pending: PendingAnswers::new(),
            settings,
        }
    }

    pub fn pending(&self) -> &PendingAnswers {
        &self.pending
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    pub fn settings(&self) -> &DialogSettings {
        &self.settings
    }

    pub fn model(&self) -> &ModelClient {
        &self.model
    }

    /// Handle one turn. Never fails: internal errors become the apology text.
    #[instrument(skip_all, fields(session_id = tracing::field::Empty))]
    pub async fn handle(&self, request: &WebhookRequest) -> WebhookResponse {
        let session_id = session_id_of(request);
        tracing::Span::current().record("session_id", session_id.as_str());

        let response = match self.route(request, &session_id).await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "Turn handling failed");
                EventLogger::log_turn(
                    &session_id,
                    TurnEvent::UpstreamFailed {
                        error: format!("{e:#}"),
                    },
                );
                WebhookResponse::reply_to(request, replies::APOLOGY)
            }
        };
        response.capped(self.settings.max_text_chars)
    }

    async fn route(&self, request: &WebhookRequest, session_id: &str) -> Result<WebhookResponse> {
        let info = request.session_info();
        let raw = request.utterance();

        if info.is_new && raw.trim().is_empty() {
            self.end_session(session_id).await?;
            EventLogger::log_turn(session_id, TurnEvent::Greeting);
            return Ok(WebhookResponse::reply_to(request, replies::GREETING)
                .with_buttons(replies::GREETING_BUTTONS.iter().copied()));
        }

        let mut state = if info.is_new {
            // A new platform session replaces whatever we remembered.
            self.end_session(session_id).await?;
            SessionState::new(session_id)
        } else {
            self.store.load(session_id).await?
        };
        state.turns += 1;
        state.last_seen = Utc::now();

        let utterance = parse_utterance(raw);
        if utterance.is_empty() {
            self.store.save(state).await?;
            EventLogger::log_turn(session_id, TurnEvent::EmptyUtterance);
            return Ok(WebhookResponse::reply_to(request, replies::ASK_FOR_INPUT));
        }

        let command = detect_command(&utterance.normalized);

        if let Some(command) = &command {
            if let Some(reply) = scripted_reply(command, state.turns) {
                if reply.end_session {
                    self.end_session(session_id).await?;
                    EventLogger::log_turn(session_id, TurnEvent::SessionEnded);
                    return Ok(WebhookResponse::reply_to(request, reply.text).end_session());
                }
                state.remember(ChatMessage::user(&utterance.text), self.settings.history_depth);
                state.remember(ChatMessage::assistant(&reply.text), self.settings.history_depth);
                self.store.save(state).await?;
                EventLogger::log_turn(
                    session_id,
                    TurnEvent::Scripted {
                        command: command.key().to_string(),
                    },
                );
                return Ok(WebhookResponse::reply_to(request, reply.text).with_buttons(reply.buttons));
            }
        }

        let wants_continue = command == Some(FastCommand::Continue);

        if let Some(key) = state.pending.clone() {
            match self.pending.collect(&key).await {
                Collected::Finished(outcome) => {
                    state.pending = None;
                    state.remember(ChatMessage::user(&utterance.text), self.settings.history_depth);
                    let text = match outcome {
                        Ok(answer) => {
                            state.remember(ChatMessage::assistant(&answer), self.settings.history_depth);
                            EventLogger::log_turn(session_id, TurnEvent::PendingDelivered { pending_key: key });
                            answer
                        }
                        Err(error) => {
                            EventLogger::log_turn(session_id, TurnEvent::UpstreamFailed { error });
                            replies::APOLOGY.to_string()
                        }
                    };
                    self.store.save(state).await?;
                    return Ok(WebhookResponse::reply_to(request, text));
                }
                Collected::Running if wants_continue => {
                    self.store.save(state).await?;
                    EventLogger::log_turn(session_id, TurnEvent::PendingNotReady { pending_key: key });
                    return Ok(WebhookResponse::reply_to(request, replies::STILL_WORKING)
                        .with_buttons([replies::CONTINUE_BUTTON]));
                }
                Collected::Running => {
                    // A fresh question supersedes the unanswered one.
                    self.pending.cancel(&key).await;
                    state.pending = None;
                }
                Collected::Missing => {
                    warn!(pending_key = %key, "Pending answer vanished (evicted or cancelled)");
                    state.pending = None;
                }
            }
        }

        if wants_continue {
            self.store.save(state).await?;
            EventLogger::log_turn(session_id, TurnEvent::NothingPending);
            return Ok(WebhookResponse::reply_to(request, replies::NOTHING_PENDING));
        }

        let text = self.ask_model(state, &utterance).await?;
        Ok(WebhookResponse::reply_to(request, text))
    }

    /// Start a background model call and wait for it up to the deadline.
    async fn ask_model(&self, mut state: SessionState, utterance: &Utterance) -> Result<String> {
        let session_id = state.session_id.clone();
        let depth = self.settings.history_depth;

        let mut messages = state.history_vec();
        messages.push(ChatMessage::user(&utterance.text));
        state.remember(ChatMessage::user(&utterance.text), depth);

        let key = PendingAnswers::make_key(&session_id);
        state.pending = Some(key.clone());
        self.store.save(state).await?;

        let model = self.model.clone();
        let prompt = Prompt::Messages(messages);
        let mut rx = self
            .pending
            .spawn(key.clone(), &session_id, async move { model.complete(prompt).await })
            .await;

        let started = Instant::now();
        let deadline = self.settings.response_timeout();
        let outcome = tokio::time::timeout(deadline, async {
            match rx.wait_for(PendingState::is_finished).await.map(|s| (*s).clone()) {
                Ok(PendingState::Ready(answer)) => Ok(answer),
                Ok(PendingState::Failed(error)) => Err(error),
                Ok(PendingState::Running) | Err(_) => {
                    Err("background call ended without a result".to_string())
                }
            }
        })
        .await;

        let outcome = match outcome {
            Ok(finished) => finished,
            Err(_) => {
                info!(pending_key = %key, deadline_ms = deadline.as_millis() as u64, "Model missed the deadline; deferring");
                EventLogger::log_turn(&session_id, TurnEvent::Deferred { pending_key: key });
                return Ok(replies::THINKING.to_string());
            }
        };

        // Answered in time: the entry is ours to consume.
        self.pending.collect(&key).await;
        let mut state = self.store.load(&session_id).await?;
        if state.pending.as_deref() == Some(key.as_str()) {
            state.pending = None;
        }

        let text = match outcome {
            Ok(answer) => {
                state.remember(ChatMessage::assistant(&answer), depth);
                EventLogger::log_turn(
                    &session_id,
                    TurnEvent::Answered {
                        latency_ms: started.elapsed().as_millis() as u64,
                    },
                );
                answer
            }
            Err(error) => {
                EventLogger::log_turn(&session_id, TurnEvent::UpstreamFailed { error });
                replies::APOLOGY.to_string()
            }
        };
        self.store.save(state).await?;
        Ok(text)
    }

    /// Drop session state and abort its background call, if any.
    async fn end_session(&self, session_id: &str) -> Result<()> {
        if let Some(state) = self.store.remove(session_id).await? {
            if let Some(key) = state.pending {
                self.pending.cancel(&key).await;
            }
        }
        Ok(())
    }
}

fn session_id_of(request: &WebhookRequest) -> String {
    let id = request.session_info().session_id;
    if id.is_empty() {
        ANONYMOUS_SESSION.to_string()
    } else {
        id
    }
}
