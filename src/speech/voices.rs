//! Installed-voice registry and best-voice selection.

/// One installed voice as reported by the platform backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceInfo {
    /// Backend voice identifier (e.g. `Thomas`, `english-us`).
    pub name: String,
    /// BCP-47-style tag, e.g. `en-US`.
    pub language: String,
    /// Whether the voice synthesizes locally rather than via a network
    /// service.
    pub local: bool,
}

/// Pick the best installed voice for a language tag.
///
/// Preference order: locally-installed voice with the exact language-region
/// tag, local voice matching the bare language prefix, any voice with the
/// exact tag, any voice matching the prefix. `None` means the caller should
/// degrade to silence.
pub fn select_voice<'a>(voices: &'a [VoiceInfo], tag: &str) -> Option<&'a VoiceInfo> {
    let prefix = bare_prefix(tag);

    voices
        .iter()
        .find(|v| v.local && matches_exact(v, tag))
        .or_else(|| voices.iter().find(|v| v.local && matches_prefix(v, prefix)))
        .or_else(|| voices.iter().find(|v| matches_exact(v, tag)))
        .or_else(|| voices.iter().find(|v| matches_prefix(v, prefix)))
}

fn bare_prefix(tag: &str) -> &str {
    tag.split('-').next().unwrap_or(tag)
}

fn matches_exact(voice: &VoiceInfo, tag: &str) -> bool {
    voice.language.eq_ignore_ascii_case(tag)
}

fn matches_prefix(voice: &VoiceInfo, prefix: &str) -> bool {
    bare_prefix(&voice.language).eq_ignore_ascii_case(prefix)
}
