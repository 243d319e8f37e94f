//! Vocabulary Provider
//!
//! Immutable letter → entry table covering A–Z in all supported languages.
//! The table is loaded from an embedded JSON asset and validated at
//! construction; the dispatcher never mutates it.

use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

const VOCABULARY_JSON: &str = include_str!("../../assets/vocabulary.json");

/// Supported languages, in the fixed cycling order used by the language
/// toggle: English → French → Mandarin → English.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    English,
    French,
    Mandarin,
}

impl Language {
    /// Next language in the three-way rotation.
    pub fn next(self) -> Self {
        match self {
            Language::English => Language::French,
            Language::French => Language::Mandarin,
            Language::Mandarin => Language::English,
        }
    }

    /// BCP-47 tag handed to the speech service.
    pub fn tag(self) -> &'static str {
        match self {
            Language::English => "en-US",
            Language::French => "fr-FR",
            Language::Mandarin => "zh-CN",
        }
    }

    /// Name shown on the language badge, in the language itself.
    pub fn display_name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::French => "Français",
            Language::Mandarin => "中文",
        }
    }

    pub fn flag(self) -> &'static str {
        match self {
            Language::English => "🇬🇧",
            Language::French => "🇫🇷",
            Language::Mandarin => "🇨🇳",
        }
    }

    /// Parse a config value like `language = "french"`.
    pub fn from_config_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "english" => Some(Language::English),
            "french" => Some(Language::French),
            "mandarin" | "chinese" => Some(Language::Mandarin),
            _ => None,
        }
    }
}

/// Per-language data for one letter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    /// Text shown on screen.
    pub display_word: String,
    /// Exact string handed to speech synthesis. Never empty.
    pub pronunciation: String,
    pub emoji: String,
    /// Pinyin accompanying a Chinese-character display word; `None` for
    /// languages whose display word is already in the display alphabet.
    pub romanization: Option<String>,
}

/// One immutable vocabulary record, keyed by its uppercase letter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabularyEntry {
    pub letter: char,
    english: Translation,
    french: Translation,
    mandarin: Translation,
}

impl VocabularyEntry {
    pub fn translation(&self, language: Language) -> &Translation {
        match language {
            Language::English => &self.english,
            Language::French => &self.french,
            Language::Mandarin => &self.mandarin,
        }
    }
}

#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("invalid vocabulary JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("vocabulary key {0:?} is not a single uppercase letter")]
    BadKey(String),
    #[error("letter {0} is missing from the vocabulary table")]
    MissingLetter(char),
    #[error("letter {letter} has an empty word for {language}")]
    EmptyWord { letter: char, language: &'static str },
}

#[derive(Debug, Deserialize)]
struct RawWord {
    word: String,
    emoji: String,
    #[serde(default)]
    pinyin: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    english: RawWord,
    french: RawWord,
    mandarin: RawWord,
}

/// The letter → [`VocabularyEntry`] table. Total for A–Z by construction.
#[derive(Debug)]
pub struct Vocabulary {
    entries: HashMap<char, VocabularyEntry>,
}

impl Vocabulary {
    /// Build the table from the embedded asset.
    pub fn builtin() -> Result<Self, VocabularyError> {
        Self::from_json(VOCABULARY_JSON)
    }

    /// Build and validate a table from JSON text.
    pub fn from_json(json: &str) -> Result<Self, VocabularyError> {
        let raw: HashMap<String, RawEntry> = serde_json::from_str(json)?;

        let mut entries = HashMap::with_capacity(raw.len());
        for (key, raw_entry) in raw {
            let mut chars = key.chars();
            let letter = match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii_uppercase() => c,
                _ => return Err(VocabularyError::BadKey(key)),
            };
            entries.insert(letter, build_entry(letter, raw_entry)?);
        }

        for letter in 'A'..='Z' {
            if !entries.contains_key(&letter) {
                return Err(VocabularyError::MissingLetter(letter));
            }
        }

        tracing::debug!("Vocabulary loaded: {} letters", entries.len());
        Ok(Self { entries })
    }

    /// Look up a letter by exact uppercase character.
    pub fn get(&self, letter: char) -> Option<&VocabularyEntry> {
        self.entries.get(&letter)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolve the spoken-phrase convention for one letter.
///
/// English and French speak a combined phrase ("A for Apple", "A comme
/// Avion"); Mandarin speaks the native-script word and keeps pinyin as the
/// on-screen romanization.
fn build_entry(letter: char, raw: RawEntry) -> Result<VocabularyEntry, VocabularyError> {
    let check = |word: &str, language: &'static str| {
        if word.trim().is_empty() {
            Err(VocabularyError::EmptyWord { letter, language })
        } else {
            Ok(())
        }
    };
    check(&raw.english.word, "english")?;
    check(&raw.french.word, "french")?;
    check(&raw.mandarin.word, "mandarin")?;

    Ok(VocabularyEntry {
        letter,
        english: Translation {
            pronunciation: format!("{} for {}", letter, raw.english.word),
            display_word: raw.english.word,
            emoji: raw.english.emoji,
            romanization: None,
        },
        french: Translation {
            pronunciation: format!("{} comme {}", letter, raw.french.word),
            display_word: raw.french.word,
            emoji: raw.french.emoji,
            romanization: None,
        },
        mandarin: Translation {
            pronunciation: raw.mandarin.word.clone(),
            display_word: raw.mandarin.word,
            emoji: raw.mandarin.emoji,
            romanization: raw.mandarin.pinyin,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_is_total_for_all_letters_and_languages() {
        let vocab = Vocabulary::builtin().expect("embedded asset should be valid");
        assert_eq!(vocab.len(), 26);

        for letter in 'A'..='Z' {
            let entry = vocab.get(letter).expect("every letter has an entry");
            assert_eq!(entry.letter, letter);
            for language in [Language::English, Language::French, Language::Mandarin] {
                let t = entry.translation(language);
                assert!(!t.pronunciation.is_empty(), "{letter} {language:?}");
                assert!(!t.display_word.is_empty(), "{letter} {language:?}");
                assert!(!t.emoji.is_empty(), "{letter} {language:?}");
            }
        }
    }

    #[test]
    fn phrase_conventions_are_uniform() {
        let vocab = Vocabulary::builtin().unwrap();
        let a = vocab.get('A').unwrap();

        assert_eq!(a.translation(Language::English).pronunciation, "A for Apple");
        assert_eq!(a.translation(Language::French).pronunciation, "A comme Avion");

        let mandarin = a.translation(Language::Mandarin);
        assert_eq!(mandarin.pronunciation, "苹果");
        assert_eq!(mandarin.display_word, "苹果");
        assert_eq!(mandarin.romanization.as_deref(), Some("Píngguǒ"));
    }

    #[test]
    fn romanization_only_for_mandarin() {
        let vocab = Vocabulary::builtin().unwrap();
        let b = vocab.get('B').unwrap();
        assert!(b.translation(Language::English).romanization.is_none());
        assert!(b.translation(Language::French).romanization.is_none());
        assert!(b.translation(Language::Mandarin).romanization.is_some());
    }

    #[test]
    fn lookup_is_exact_uppercase() {
        let vocab = Vocabulary::builtin().unwrap();
        assert!(vocab.get('a').is_none());
        assert!(vocab.get('1').is_none());
        assert!(vocab.get('Q').is_some());
    }

    #[test]
    fn missing_letter_is_a_construction_error() {
        let json = r#"{ "A": {
            "english": { "word": "Apple", "emoji": "🍎" },
            "french": { "word": "Avion", "emoji": "✈️" },
            "mandarin": { "word": "苹果", "pinyin": "Píngguǒ", "emoji": "🍎" }
        } }"#;
        let err = Vocabulary::from_json(json).unwrap_err();
        assert!(matches!(err, VocabularyError::MissingLetter('B')));
    }

    #[test]
    fn empty_word_is_a_construction_error() {
        let json = r#"{ "A": {
            "english": { "word": "", "emoji": "🍎" },
            "french": { "word": "Avion", "emoji": "✈️" },
            "mandarin": { "word": "苹果", "pinyin": "Píngguǒ", "emoji": "🍎" }
        } }"#;
        let err = Vocabulary::from_json(json).unwrap_err();
        assert!(matches!(
            err,
            VocabularyError::EmptyWord { letter: 'A', language: "english" }
        ));
    }

    #[test]
    fn language_cycle_has_period_three() {
        let start = Language::English;
        assert_eq!(start.next(), Language::French);
        assert_eq!(start.next().next(), Language::Mandarin);
        assert_eq!(start.next().next().next(), start);
    }

    #[test]
    fn language_names_parse_from_config() {
        assert_eq!(Language::from_config_name("English"), Some(Language::English));
        assert_eq!(Language::from_config_name("chinese"), Some(Language::Mandarin));
        assert_eq!(Language::from_config_name("klingon"), None);
    }
}
