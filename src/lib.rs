//! TinyTyper - keyboard letter-learning kiosk
//!
//! Press a letter key A-Z to see the letter, an illustrative emoji and a
//! vocabulary word in English, French or Mandarin (with pinyin), and hear
//! it spoken through the platform's text-to-speech command. A cooldown
//! between accepted keys keeps an enthusiastic child from flooding the
//! speech engine.

pub mod business;
pub mod data;
pub mod platform;
pub mod speech;
pub mod ui;

pub use business::{KeyDispatcher, KeyOutcome, RenderState};
pub use data::{AppConfig, Language, Vocabulary, VocabularyEntry};
pub use platform::{NullBackend, PlatformFactory, SpeechBackend};
pub use speech::{SpeechClient, SpeechService};
