//! macOS speech backend built on the system `say` command.

use std::process::Command;

use super::{probe_command, CurrentUtterance, SpeechBackend, SpeechError};
use crate::speech::VoiceInfo;

pub struct SayBackend {
    utterance: CurrentUtterance,
}

impl SayBackend {
    /// Verify that `say` is present (it ships with macOS, but the binary
    /// may be missing in stripped-down environments).
    pub fn probe() -> Result<Self, SpeechError> {
        probe_command("say", &["-v", "?"])?;
        Ok(Self {
            utterance: CurrentUtterance::new(),
        })
    }
}

impl SpeechBackend for SayBackend {
    fn name(&self) -> &'static str {
        "say"
    }

    fn voices(&self) -> Vec<VoiceInfo> {
        let output = match Command::new("say").args(["-v", "?"]).output() {
            Ok(output) if output.status.success() => output,
            Ok(output) => {
                tracing::warn!("say -v ? exited with {:?}", output.status.code());
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!("Failed to list say voices: {}", e);
                return Vec::new();
            }
        };

        let text = String::from_utf8_lossy(&output.stdout);
        parse_voice_list(&text)
    }

    fn speak(&self, text: &str, voice: &VoiceInfo) -> Result<(), SpeechError> {
        let mut command = Command::new("say");
        command.args(["-v", &voice.name, text]);
        self.utterance.run(command)
    }

    fn cancel(&self) {
        self.utterance.cancel();
    }
}

/// Parse `say -v ?` output.
///
/// Each line looks like `Amélie              fr_CA    # Bonjour! ...`;
/// voice names can contain spaces, so split on the last whitespace run
/// before the locale. `say` voices are installed locally by definition.
fn parse_voice_list(text: &str) -> Vec<VoiceInfo> {
    text.lines()
        .filter_map(|line| {
            let head = line.split('#').next()?.trim_end();
            let (name, locale) = head.rsplit_once(char::is_whitespace)?;
            let name = name.trim();
            if name.is_empty() || locale.is_empty() {
                return None;
            }
            Some(VoiceInfo {
                name: name.to_string(),
                language: locale.replace('_', "-"),
                local: true,
            })
        })
        .collect()
}
