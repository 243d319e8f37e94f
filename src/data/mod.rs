//! Data module for configuration and the vocabulary table

mod config;
mod vocabulary;

pub use config::{AppConfig, GeneralConfig, InputConfig, SpeechConfig};
pub use vocabulary::{Language, Translation, Vocabulary, VocabularyEntry, VocabularyError};
