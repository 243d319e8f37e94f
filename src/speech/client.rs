//! Speech Client
//!
//! Bridges the dispatcher to the platform speech backend. Dispatch is
//! fire-and-forget: the current utterance is interrupted, the best voice
//! for the language is selected, and the backend runs on a blocking task.
//! Failures are logged and never surfaced to the child at the keyboard.

use std::sync::Arc;

use crate::data::Language;
use crate::platform::SpeechBackend;

use super::voices::{select_voice, VoiceInfo};

/// Best-effort, asynchronous speech service consumed by the dispatcher.
///
/// Injected as a trait so the dispatcher can be exercised in tests with a
/// fake that records dispatched phrases.
pub trait SpeechService: Send + Sync {
    /// Speak one utterance, interrupting any utterance in progress.
    /// Never blocks, never errors; an unavailable backend means silence.
    fn speak(&self, text: &str, language: Language);
    /// Stop in-progress speech without starting anything new.
    fn cancel_current(&self);
}

/// Production [`SpeechService`] over a platform backend.
pub struct SpeechClient {
    backend: Arc<dyn SpeechBackend>,
    voices: Vec<VoiceInfo>,
}

impl SpeechClient {
    /// Wrap a backend and snapshot its installed voices.
    pub fn new(backend: Box<dyn SpeechBackend>) -> Self {
        let backend: Arc<dyn SpeechBackend> = Arc::from(backend);
        let voices = backend.voices();
        if voices.is_empty() {
            tracing::warn!(
                "Speech backend {:?} reported no voices, kiosk will be silent",
                backend.name()
            );
        } else {
            tracing::info!(
                "Speech backend {:?} ready with {} voices",
                backend.name(),
                voices.len()
            );
        }
        Self { backend, voices }
    }

    pub fn voices(&self) -> &[VoiceInfo] {
        &self.voices
    }
}

impl SpeechService for SpeechClient {
    fn speak(&self, text: &str, language: Language) {
        // Interrupt before dispatching so utterances never overlap.
        self.backend.cancel();

        let Some(voice) = select_voice(&self.voices, language.tag()) else {
            tracing::debug!(
                "No voice installed for {}, dropping utterance {:?}",
                language.tag(),
                text
            );
            return;
        };

        tracing::debug!("Speaking {:?} with voice {:?}", text, voice.name);

        let backend = self.backend.clone();
        let voice = voice.clone();
        let text = text.to_owned();
        tokio::task::spawn_blocking(move || {
            if let Err(e) = backend.speak(&text, &voice) {
                tracing::warn!("Speech failed: {}", e);
            }
        });
    }

    fn cancel_current(&self) {
        self.backend.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::SpeechError;
    use std::sync::mpsc;
    use std::sync::Mutex;
    use std::time::Duration;

    enum Call {
        Cancel,
        Speak(String, String),
    }

    struct RecordingBackend {
        voices: Vec<VoiceInfo>,
        calls: Mutex<mpsc::Sender<Call>>,
    }

    impl RecordingBackend {
        fn new(voices: Vec<VoiceInfo>) -> (Box<Self>, mpsc::Receiver<Call>) {
            let (tx, rx) = mpsc::channel();
            (
                Box::new(Self {
                    voices,
                    calls: Mutex::new(tx),
                }),
                rx,
            )
        }

        fn record(&self, call: Call) {
            if let Ok(tx) = self.calls.lock() {
                let _ = tx.send(call);
            }
        }
    }

    impl SpeechBackend for RecordingBackend {
        fn name(&self) -> &'static str {
            "recording"
        }

        fn voices(&self) -> Vec<VoiceInfo> {
            self.voices.clone()
        }

        fn speak(&self, text: &str, voice: &VoiceInfo) -> Result<(), SpeechError> {
            self.record(Call::Speak(text.to_string(), voice.name.clone()));
            Ok(())
        }

        fn cancel(&self) {
            self.record(Call::Cancel);
        }
    }

    fn english_voice() -> VoiceInfo {
        VoiceInfo {
            name: "Alex".to_string(),
            language: "en-US".to_string(),
            local: true,
        }
    }

    #[tokio::test]
    async fn cancels_before_speaking() {
        let (backend, calls) = RecordingBackend::new(vec![english_voice()]);
        let client = SpeechClient::new(backend);

        client.speak("A for Apple", Language::English);

        let first = calls.recv_timeout(Duration::from_secs(1)).unwrap();
        assert!(matches!(first, Call::Cancel));
        match calls.recv_timeout(Duration::from_secs(1)).unwrap() {
            Call::Speak(text, voice) => {
                assert_eq!(text, "A for Apple");
                assert_eq!(voice, "Alex");
            }
            Call::Cancel => panic!("expected the utterance after the cancel"),
        }
    }

    #[tokio::test]
    async fn missing_voice_degrades_to_silence() {
        let (backend, calls) = RecordingBackend::new(vec![english_voice()]);
        let client = SpeechClient::new(backend);

        client.speak("苹果", Language::Mandarin);

        // The interrupt still happens, but nothing is spoken.
        assert!(matches!(
            calls.recv_timeout(Duration::from_secs(1)).unwrap(),
            Call::Cancel
        ));
        assert!(calls.recv_timeout(Duration::from_millis(200)).is_err());
    }
}
