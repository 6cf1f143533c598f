//! Scripted replies for fast commands. None of these touch the model.

use crate::replies;
use crate::types::FastCommand;
use crate::vocabulary;

/// Quiz questions, asked in rotation by session turn number.
const QUIZ_QUESTIONS: &[&str] = &[
    "Как по-английски «собака»?",
    "Какого цвета banana? Скажи по-английски.",
    "Переведи: «I have a cat».",
    "Как сказать «спасибо» по-английски?",
    "Что значит слово «apple»?",
    "Сосчитай до трёх по-английски.",
];

/// The reply produced by a fast command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedReply {
    pub text: String,
    pub end_session: bool,
    pub buttons: Vec<String>,
}

impl ScriptedReply {
    fn say(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            end_session: false,
            buttons: Vec::new(),
        }
    }
}

/// Reply for `command`, or `None` when the model has to answer instead
/// (unknown vocabulary) or the command needs session context (continue).
pub fn scripted_reply(command: &FastCommand, turn: u64) -> Option<ScriptedReply> {
    match command {
        FastCommand::Stop => Some(ScriptedReply {
            end_session: true,
            ..ScriptedReply::say(replies::GOODBYE)
        }),
        FastCommand::Help => Some(ScriptedReply::say(replies::HELP)),
        FastCommand::Quiz => {
            let question = QUIZ_QUESTIONS[(turn as usize) % QUIZ_QUESTIONS.len()];
            Some(ScriptedReply {
                buttons: vec!["Ещё вопрос".to_string(), "Стоп".to_string()],
                ..ScriptedReply::say(format!("Викторина! {question}"))
            })
        }
        FastCommand::Vocabulary { term } => {
            vocabulary::lookup(term).map(|t| ScriptedReply::say(t.sentence()))
        }
        FastCommand::Continue => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_ends_session() {
        let reply = scripted_reply(&FastCommand::Stop, 3).unwrap();
        assert!(reply.end_session);
        assert_eq!(reply.text, replies::GOODBYE);
    }

    #[test]
    fn quiz_is_deterministic_per_turn() {
        let a = scripted_reply(&FastCommand::Quiz, 1).unwrap();
        let b = scripted_reply(&FastCommand::Quiz, 1).unwrap();
        let c = scripted_reply(&FastCommand::Quiz, 2).unwrap();
        assert_eq!(a, b);
        assert_ne!(a.text, c.text);
        assert!(a.text.starts_with("Викторина!"));
    }

    #[test]
    fn quiz_buttons_are_fast_commands() {
        let reply = scripted_reply(&FastCommand::Quiz, 1).unwrap();
        for title in &reply.buttons {
            let u = crate::detection::parse_utterance(title);
            assert!(crate::detection::detect_command(&u.normalized).is_some(), "{title}");
        }
    }

    #[test]
    fn unknown_vocabulary_falls_through() {
        let cmd = FastCommand::Vocabulary {
            term: "photosynthesis".into(),
        };
        assert!(scripted_reply(&cmd, 1).is_none());
    }

    #[test]
    fn continue_needs_session_context() {
        assert!(scripted_reply(&FastCommand::Continue, 1).is_none());
    }
}
