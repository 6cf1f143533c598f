//! Dialog handling for tutorbridge.
//!
//! One [`DialogHandler`] owns the session store, the registry of deferred
//! answers and the model client, and turns each webhook call into a reply.

pub mod detection;
pub mod dialog;
pub mod handlers;
pub mod pending;
pub mod reaper;
pub mod replies;
pub mod store;
pub mod types;
pub mod vocabulary;

pub use detection::{detect_command, normalize, parse_utterance};
pub use dialog::{DialogHandler, ANONYMOUS_SESSION};
pub use handlers::{scripted_reply, ScriptedReply};
pub use pending::{Collected, PendingAnswers, PendingKey, PendingState};
pub use reaper::spawn_pending_reaper;
pub use store::{InMemorySessionStore, SessionState, SessionStore};
pub use types::{FastCommand, Utterance};
