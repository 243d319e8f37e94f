//! Linux speech backend built on espeak-ng.

use std::process::Command;

use super::{probe_command, CurrentUtterance, SpeechBackend, SpeechError};
use crate::speech::VoiceInfo;

pub struct EspeakBackend {
    utterance: CurrentUtterance,
}

impl EspeakBackend {
    /// Verify that espeak-ng is installed before committing to it.
    pub fn probe() -> Result<Self, SpeechError> {
        probe_command("espeak-ng", &["--version"])?;
        Ok(Self {
            utterance: CurrentUtterance::new(),
        })
    }
}

impl SpeechBackend for EspeakBackend {
    fn name(&self) -> &'static str {
        "espeak-ng"
    }

    fn voices(&self) -> Vec<VoiceInfo> {
        let output = match Command::new("espeak-ng").arg("--voices").output() {
            Ok(output) if output.status.success() => output,
            Ok(output) => {
                tracing::warn!("espeak-ng --voices exited with {:?}", output.status.code());
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!("Failed to list espeak-ng voices: {}", e);
                return Vec::new();
            }
        };

        let text = String::from_utf8_lossy(&output.stdout);
        parse_voice_list(&text)
    }

    fn speak(&self, text: &str, voice: &VoiceInfo) -> Result<(), SpeechError> {
        let mut command = Command::new("espeak-ng");
        command.args(["-v", &voice.name, text]);
        self.utterance.run(command)
    }

    fn cancel(&self) {
        self.utterance.cancel();
    }
}

/// Parse `espeak-ng --voices` output.
///
/// Columns: `Pty Language Age/Gender VoiceName File Other Languages`.
/// The first line is a header. espeak-ng lists every voice as locally
/// synthesized, so all entries are marked local.
fn parse_voice_list(text: &str) -> Vec<VoiceInfo> {
    text.lines()
        .skip(1)
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            let language = fields.get(1)?;
            let name = fields.get(3)?;
            Some(VoiceInfo {
                name: (*name).to_string(),
                language: normalize_language(language),
                local: true,
            })
        })
        .collect()
}

/// espeak-ng names Mandarin `cmn` and Cantonese `yue`; map the former to
/// the BCP-47 tag the vocabulary uses so the selection chain can match it.
fn normalize_language(language: &str) -> String {
    match language {
        "cmn" => "zh-CN".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::select_voice;

    const SAMPLE: &str = "\
Pty Language       Age/Gender VoiceName          File                 Other Languages
 5  af              --/M      afrikaans            gmw/af
 2  en-gb           --/M      english              gmw/en               (en 2)
 2  en-us           --/M      english-us           gmw/en-US            (en 3)
 5  fr-fr           --/M      french               roa/fr               (fr 5)
 5  cmn             --/M      chinese-mandarin     sit/cmn              (zh 5)";

    #[test]
    fn parses_language_and_voice_name_columns() {
        let voices = parse_voice_list(SAMPLE);
        assert_eq!(voices.len(), 5);
        assert_eq!(voices[1].name, "english");
        assert_eq!(voices[1].language, "en-gb");
        assert!(voices[1].local);
    }

    #[test]
    fn mandarin_code_is_normalized_to_bcp47() {
        let voices = parse_voice_list(SAMPLE);
        let mandarin = voices.iter().find(|v| v.name == "chinese-mandarin").unwrap();
        assert_eq!(mandarin.language, "zh-CN");
        assert_eq!(
            select_voice(&voices, "zh-CN").map(|v| v.name.as_str()),
            Some("chinese-mandarin")
        );
    }

    #[test]
    fn parsed_list_feeds_the_selection_chain() {
        let voices = parse_voice_list(SAMPLE);
        // BCP-47 tags compare case-insensitively, so en-us is an exact hit.
        let voice = select_voice(&voices, "en-US").unwrap();
        assert_eq!(voice.name, "english-us");
    }
}
