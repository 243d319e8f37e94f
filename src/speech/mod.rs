//! Speech service: voice selection and fire-and-forget utterance dispatch.

mod client;
mod voices;

pub use client::{SpeechClient, SpeechService};
pub use voices::{select_voice, VoiceInfo};
