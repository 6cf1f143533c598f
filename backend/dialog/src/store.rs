//! Per-session conversational state.
//!
//! The handler only talks to [`SessionStore`]; the in-memory map is one
//! implementation and a persistent backend can replace it.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tutorbridge_core::ChatMessage;

use crate::pending::PendingKey;

/// Active state of one voice session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub session_id: String,
    /// Most recent exchanges, oldest first, at most `history_depth` long.
    pub history: VecDeque<ChatMessage>,
    /// Deferred answer this session is waiting for.
    pub pending: Option<PendingKey>,
    /// Turns handled so far, including the current one.
    pub turns: u64,
    pub last_seen: DateTime<Utc>,
}

impl SessionState {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            history: VecDeque::new(),
            pending: None,
            turns: 0,
            last_seen: Utc::now(),
        }
    }

    /// Append to history, dropping the oldest entries beyond `depth`.
    pub fn remember(&mut self, message: ChatMessage, depth: usize) {
        self.history.push_back(message);
        while self.history.len() > depth {
            self.history.pop_front();
        }
    }

    pub fn history_vec(&self) -> Vec<ChatMessage> {
        self.history.iter().cloned().collect()
    }
}

/// Storage for [`SessionState`], keyed by session id.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Fetch a session, or a fresh state if none is stored.
    async fn load(&self, session_id: &str) -> Result<SessionState>;

    /// Insert or replace a session.
    async fn save(&self, state: SessionState) -> Result<()>;

    /// Forget a session. Returns the removed state, if any.
    async fn remove(&self, session_id: &str) -> Result<Option<SessionState>>;

    /// Number of stored sessions.
    async fn len(&self) -> usize;
}

/// Process-lifetime session map.
#[derive(Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionState>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self, session_id: &str) -> Result<SessionState> {
        let r = self.sessions.read().await;
        Ok(r
            .get(session_id)
            .cloned()
            .unwrap_or_else(|| SessionState::new(session_id)))
    }

    async fn save(&self, state: SessionState) -> Result<()> {
        let mut w = self.sessions.write().await;
        w.insert(state.session_id.clone(), state);
        Ok(())
    }

    async fn remove(&self, session_id: &str) -> Result<Option<SessionState>> {
        let mut w = self.sessions.write().await;
        Ok(w.remove(session_id))
    }

    async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remember_trims_to_depth() {
        let mut state = SessionState::new("s");
        for i in 0..10 {
            state.remember(ChatMessage::user(format!("q{i}")), 4);
        }
        assert_eq!(state.history.len(), 4);
        assert_eq!(state.history.front().unwrap().content, "q6");
        assert_eq!(state.history.back().unwrap().content, "q9");
    }

    #[test]
    fn zero_depth_keeps_nothing() {
        let mut state = SessionState::new("s");
        state.remember(ChatMessage::user("hi"), 0);
        assert!(state.history.is_empty());
    }

    #[tokio::test]
    async fn load_save_remove_roundtrip() {
        let store = InMemorySessionStore::new();
        let fresh = store.load("a").await.unwrap();
        assert_eq!(fresh.turns, 0);
        assert_eq!(store.len().await, 0);

        let mut state = fresh;
        state.turns = 3;
        store.save(state).await.unwrap();
        assert_eq!(store.load("a").await.unwrap().turns, 3);
        assert_eq!(store.len().await, 1);

        let removed = store.remove("a").await.unwrap();
        assert_eq!(removed.map(|s| s.turns), Some(3));
        assert_eq!(store.len().await, 0);
    }
}
