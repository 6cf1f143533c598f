//! Deferred answers.
//!
//! A model call that may outlive its turn runs as a spawned task. Its result
//! lands in a watch channel registered here under a pending key, so the turn
//! that started it can wait up to a deadline and a later turn can collect it.
//! Entries are removed when collected, cancelled, or older than the TTL.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{watch, Mutex};
use tokio::task::AbortHandle;
use tokio::time::Instant;
use tracing::{debug, info};
use tutorbridge_core::TutorError;

static LAST_KEY_MILLIS: AtomicI64 = AtomicI64::new(0);

/// Correlates a background model call with its eventual answer.
pub type PendingKey = String;

/// Progress of one background call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingState {
    Running,
    Ready(String),
    /// The call failed; holds the error text for logging only.
    Failed(String),
}

impl PendingState {
    pub fn is_finished(&self) -> bool {
        !matches!(self, PendingState::Running)
    }
}

/// Result of trying to collect a pending answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Collected {
    /// No entry under that key (never existed, already collected, or evicted).
    Missing,
    /// Still running; the entry stays in place.
    Running,
    /// Finished; the entry has been removed.
    Finished(Result<String, String>),
}

struct PendingEntry {
    session_id: String,
    state: watch::Receiver<PendingState>,
    abort: AbortHandle,
    created_at: Instant,
}

/// Registry of in-flight and finished background calls.
#[derive(Clone, Default)]
pub struct PendingAnswers {
    entries: Arc<Mutex<HashMap<PendingKey, PendingEntry>>>,
}

impl PendingAnswers {
    pub fn new() -> Self {
        Self::default()
    }

    /// `"{session_id}:{unix_millis}"`. The millisecond part is bumped when
    /// needed so two keys made in the same millisecond never collide.
    pub fn make_key(session_id: &str) -> PendingKey {
        let now = Utc::now().timestamp_millis();
        let millis = match LAST_KEY_MILLIS.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(now.max(last + 1))
        }) {
            Ok(last) | Err(last) => now.max(last + 1),
        };
        format!("{session_id}:{millis}")
    }

    /// Spawn `call` in the background under `key` and return a receiver that
    /// observes its completion. The task is not tied to the caller: dropping
    /// the receiver or timing out leaves it running.
    pub async fn spawn<F>(
        &self,
        key: PendingKey,
        session_id: &str,
        call: F,
    ) -> watch::Receiver<PendingState>
    where
        F: Future<Output = Result<String, TutorError>> + Send + 'static,
    {
        let (tx, rx) = watch::channel(PendingState::Running);
        let task_key = key.clone();
        let handle = tokio::spawn(async move {
            let state = match call.await {
                Ok(answer) => PendingState::Ready(answer),
                Err(e) => PendingState::Failed(e.to_string()),
            };
            debug!(pending_key = %task_key, ready = matches!(state, PendingState::Ready(_)), "Background call finished");
            tx.send_replace(state);
        });

        let entry = PendingEntry {
            session_id: session_id.to_string(),
            state: rx.clone(),
            abort: handle.abort_handle(),
            created_at: Instant::now(),
        };
        let previous = self.entries.lock().await.insert(key, entry);
        if let Some(previous) = previous {
            previous.abort.abort();
        }
        rx
    }

    /// Current state without consuming it.
    pub async fn status(&self, key: &str) -> Option<PendingState> {
        let entries = self.entries.lock().await;
        entries.get(key).map(|e| e.state.borrow().clone())
    }

    /// Collect a finished answer exactly once.
    pub async fn collect(&self, key: &str) -> Collected {
        let mut entries = self.entries.lock().await;
        let state = match entries.get(key) {
            None => return Collected::Missing,
            Some(entry) => entry.state.borrow().clone(),
        };
        match state {
            PendingState::Running => Collected::Running,
            PendingState::Ready(answer) => {
                entries.remove(key);
                Collected::Finished(Ok(answer))
            }
            PendingState::Failed(error) => {
                entries.remove(key);
                Collected::Finished(Err(error))
            }
        }
    }

    /// Abort the call under `key` and drop its entry.
    pub async fn cancel(&self, key: &str) -> bool {
        let removed = self.entries.lock().await.remove(key);
        match removed {
            Some(entry) => {
                entry.abort.abort();
                debug!(pending_key = key, session_id = %entry.session_id, "Cancelled pending answer");
                true
            }
            None => false,
        }
    }

    /// Drop entries older than `ttl`, aborting any still running.
    /// Returns the number of evicted entries.
    pub async fn evict_expired(&self, ttl: Duration) -> usize {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();
        let before = entries.len();
        entries.retain(|key, entry| {
            let keep = now.duration_since(entry.created_at) < ttl;
            if !keep {
                entry.abort.abort();
                debug!(pending_key = %key, session_id = %entry.session_id, "Evicting expired pending answer");
            }
            keep
        });
        let evicted = before - entries.len();
        if evicted > 0 {
            info!(evicted, remaining = entries.len(), "Evicted expired pending answers");
        }
        evicted
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}
