//! Built-in word list for instant translations.

/// Russian → English pairs. Russian keys use `е` in place of `ё`, matching
/// [`crate::detection::normalize`].
const WORDS: &[(&str, &str)] = &[
    ("кошка", "cat"),
    ("кот", "cat"),
    ("собака", "dog"),
    ("птица", "bird"),
    ("рыба", "fish"),
    ("лошадь", "horse"),
    ("корова", "cow"),
    ("яблоко", "apple"),
    ("банан", "banana"),
    ("молоко", "milk"),
    ("хлеб", "bread"),
    ("вода", "water"),
    ("дом", "house"),
    ("школа", "school"),
    ("книга", "book"),
    ("ручка", "pen"),
    ("стол", "table"),
    ("окно", "window"),
    ("дерево", "tree"),
    ("солнце", "sun"),
    ("машина", "car"),
    ("мяч", "ball"),
    ("мама", "mother"),
    ("папа", "father"),
    ("брат", "brother"),
    ("сестра", "sister"),
    ("друг", "friend"),
    ("красный", "red"),
    ("синий", "blue"),
    ("зеленый", "green"),
    ("желтый", "yellow"),
    ("один", "one"),
    ("два", "two"),
    ("три", "three"),
    ("привет", "hello"),
    ("спасибо", "thank you"),
    ("пожалуйста", "please"),
    ("до свидания", "goodbye"),
];

/// Direction of a successful lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    ToEnglish { russian: String, english: String },
    ToRussian { english: String, russian: String },
}

impl Translation {
    /// Sentence spoken back to the child.
    pub fn sentence(&self) -> String {
        match self {
            Translation::ToEnglish { russian, english } => {
                format!("«{}» по-английски — {english}.", capitalize(russian))
            }
            Translation::ToRussian { english, russian } => {
                format!("{} — это «{russian}».", capitalize(english))
            }
        }
    }
}

/// Look up a normalized term in either direction.
pub fn lookup(term: &str) -> Option<Translation> {
    let term = term.trim();
    if let Some((ru, en)) = WORDS.iter().find(|(ru, _)| *ru == term) {
        return Some(Translation::ToEnglish {
            russian: ru.to_string(),
            english: en.to_string(),
        });
    }
    WORDS
        .iter()
        .find(|(_, en)| *en == term)
        .map(|(ru, en)| Translation::ToRussian {
            english: en.to_string(),
            russian: ru.to_string(),
        })
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
