//! Fast-command detection: wake-word stripping, normalization and literal
//! phrase matching. All matching is case-insensitive.
use crate::types::{FastCommand, Utterance};

/// Addressing the assistant by name is not part of the question.
const WAKE_WORDS: &[&str] = &["алиса"];

const STOP_PHRASES: &[&str] = &[
    "стоп", "хватит", "выход", "выйти", "закончить", "закончим", "пока", "до свидания", "stop",
    "exit", "bye",
];

const CONTINUE_PHRASES: &[&str] = &[
    "продолжи", "продолжай", "дальше", "ну что", "ну", "готово", "что там", "ответ", "continue",
    "go on",
];

const QUIZ_PHRASES: &[&str] = &[
    "викторина", "давай викторину", "хочу викторину", "квиз", "проверь меня", "quiz",
    "еще вопрос", "следующий вопрос",
];

const HELP_PHRASES: &[&str] = &["помощь", "помоги", "что ты умеешь", "help"];

const VOCABULARY_PREFIXES: &[&str] = &[
    "как по английски будет ",
    "как будет по английски ",
    "как по английски ",
    "как сказать по английски ",
    "что значит ",
    "что означает ",
    "перевод слова ",
    "переведи слово ",
    "переведи ",
];

/// Politeness suffix ignored when matching ("продолжи пожалуйста").
const POLITE_SUFFIX: &str = " пожалуйста";

/// Strip a leading wake word and surrounding punctuation, then normalize.
pub fn parse_utterance(raw: &str) -> Utterance {
    let text = strip_wake_word(raw.trim());
    Utterance {
        normalized: normalize(text),
        text: text.to_string(),
    }
}

fn strip_wake_word(text: &str) -> &str {
    let lower = text.to_lowercase();
    for wake in WAKE_WORDS {
        if !lower.starts_with(wake) {
            continue;
        }
        // Lowercasing Cyrillic keeps char counts, so skip by chars, not bytes.
        let wake_chars = wake.chars().count();
        let rest_start = text
            .char_indices()
            .nth(wake_chars)
            .map(|(idx, _)| idx)
            .unwrap_or(text.len());
        let rest = &text[rest_start..];
        let at_boundary = rest
            .chars()
            .next()
            .map(|c| !c.is_alphanumeric())
            .unwrap_or(true);
        if at_boundary {
            return rest.trim_start_matches(|c: char| c.is_whitespace() || is_punct(c));
        }
    }
    text
}

fn is_punct(c: char) -> bool {
    matches!(c, ',' | '.' | '!' | '?' | ';' | ':' | '…' | '—' | '«' | '»' | '"' | '\'')
}

/// Lowercase, fold `ё`, turn hyphens and punctuation into spaces and
/// collapse whitespace.
pub fn normalize(text: &str) -> String {
    let folded: String = text
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'ё' => 'е',
            '-' => ' ',
            c if is_punct(c) => ' ',
            c => c,
        })
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Detect a fast command in a normalized utterance.
/// Returns `None` for anything that should go to the model.
pub fn detect_command(normalized: &str) -> Option<FastCommand> {
    let phrase = normalized.strip_suffix(POLITE_SUFFIX).unwrap_or(normalized);

    if STOP_PHRASES.contains(&phrase) {
        return Some(FastCommand::Stop);
    }
    if CONTINUE_PHRASES.contains(&phrase) {
        return Some(FastCommand::Continue);
    }
    if QUIZ_PHRASES.contains(&phrase) {
        return Some(FastCommand::Quiz);
    }
    if HELP_PHRASES.contains(&phrase) {
        return Some(FastCommand::Help);
    }

    VOCABULARY_PREFIXES.iter().find_map(|prefix| {
        let term = phrase.strip_prefix(prefix)?.trim();
        (!term.is_empty()).then(|| FastCommand::Vocabulary {
            term: term.to_string(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_wake_word_any_case() {
        let u = parse_utterance("Алиса, что значит Cat?");
        assert_eq!(u.text, "что значит Cat?");
        assert_eq!(u.normalized, "что значит cat");

        let u = parse_utterance("АЛИСА стоп");
        assert_eq!(u.normalized, "стоп");
    }

    #[test]
    fn wake_word_must_be_whole_word() {
        let u = parse_utterance("Алисами зовут многих");
        assert_eq!(u.text, "Алисами зовут многих");
    }

    #[test]
    fn bare_wake_word_leaves_nothing() {
        assert!(parse_utterance("  Алиса!  ").is_empty());
    }

    #[test]
    fn normalize_folds_yo_and_hyphens() {
        assert_eq!(normalize("Как по-английски ЁЖ?"), "как по английски еж");
    }

    #[test]
    fn detects_stop_words() {
        for word in ["стоп", "Хватит!", "до свидания", "STOP"] {
            assert_eq!(
                detect_command(&normalize(word)),
                Some(FastCommand::Stop),
                "{word}"
            );
        }
    }

    #[test]
    fn detects_continue_with_politeness() {
        assert_eq!(
            detect_command(&normalize("Продолжи, пожалуйста")),
            Some(FastCommand::Continue)
        );
    }

    #[test]
    fn detects_quiz_and_help() {
        assert_eq!(detect_command("викторина"), Some(FastCommand::Quiz));
        assert_eq!(detect_command("что ты умеешь"), Some(FastCommand::Help));
    }

    #[test]
    fn next_question_continues_the_quiz() {
        for raw in ["Ещё вопрос", "еще вопрос!", "Следующий вопрос"] {
            let u = parse_utterance(raw);
            assert_eq!(detect_command(&u.normalized), Some(FastCommand::Quiz), "{raw}");
        }
    }

    #[test]
    fn detects_vocabulary_term() {
        assert_eq!(
            detect_command(&normalize("Как по-английски кошка?")),
            Some(FastCommand::Vocabulary {
                term: "кошка".into()
            })
        );
        assert_eq!(
            detect_command(&normalize("что значит «apple»")),
            Some(FastCommand::Vocabulary {
                term: "apple".into()
            })
        );
    }

    #[test]
    fn questions_are_not_commands() {
        assert_eq!(detect_command("почему небо голубое"), None);
        assert_eq!(detect_command("стоп слово это что"), None);
        assert_eq!(detect_command("что значит"), None);
    }
}
