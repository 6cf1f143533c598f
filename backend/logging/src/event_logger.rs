//! Turn Event Logger
//!
//! One structured event per handled turn, emitted on the `turn_events`
//! target so it can be filtered or routed separately.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::redact::redact_sensitive_data;

/// How a turn was answered.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TurnEvent {
    Greeting,
    EmptyUtterance,
    Scripted { command: String },
    PendingDelivered { pending_key: String },
    PendingNotReady { pending_key: String },
    NothingPending,
    Answered { latency_ms: u64 },
    Deferred { pending_key: String },
    UpstreamFailed { error: String },
    SessionEnded,
    MalformedRequest { error: String },
}

#[derive(Debug, Serialize)]
pub struct TurnLogEntry {
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
    pub event: TurnEvent,
}

pub struct EventLogger;

impl EventLogger {
    /// Build the entry that `log_turn` emits, with free-text fields redacted.
    pub fn entry(session_id: &str, mut event: TurnEvent) -> TurnLogEntry {
        match &mut event {
            TurnEvent::UpstreamFailed { error } | TurnEvent::MalformedRequest { error } => {
                *error = redact_sensitive_data(error);
            }
            _ => {}
        }

        TurnLogEntry {
            session_id: session_id.into(),
            timestamp: Utc::now(),
            event,
        }
    }

    pub fn log_turn(session_id: &str, event: TurnEvent) {
        let entry = Self::entry(session_id, event);
        let json = serde_json::to_string(&entry).unwrap_or_default();
        info!(target: "turn_events", session_id = %entry.session_id, event = %json, "Turn handled");
    }
}
