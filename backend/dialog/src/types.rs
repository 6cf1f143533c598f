//! Fast-path command types.

// ---------------------------------------------------------------------------
// Utterance
// ---------------------------------------------------------------------------

/// An inbound utterance after wake-word stripping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    /// Cleaned text in its original case; this is what the model sees.
    pub text: String,
    /// Lowercased, punctuation-free form used for matching.
    pub normalized: String,
}

impl Utterance {
    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// A command answered without calling the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FastCommand {
    /// Ends the session.
    Stop,
    /// Asks to hear a deferred answer.
    Continue,
    Help,
    Quiz,
    /// Translation request for a single word or short phrase.
    Vocabulary { term: String },
}

impl FastCommand {
    /// Stable name used in logs.
    pub fn key(&self) -> &'static str {
        match self {
            FastCommand::Stop => "stop",
            FastCommand::Continue => "continue",
            FastCommand::Help => "help",
            FastCommand::Quiz => "quiz",
            FastCommand::Vocabulary { .. } => "vocabulary",
        }
    }
}
