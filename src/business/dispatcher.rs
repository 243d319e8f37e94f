//! Key Dispatcher
//!
//! Owns all application logic: accepts raw key presses, enforces the
//! cooldown between accepted letters, resolves the pressed key to
//! vocabulary data, fires the speech request, and exposes the snapshot the
//! presentation layer renders.
//!
//! All mutation happens on the host's single event-handling task, so no
//! locking is needed here; the speech service is the only collaborator
//! that does work off-thread, and it is fire-and-forget.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::data::{Language, Vocabulary, VocabularyEntry};
use crate::speech::SpeechService;

/// What the host should do with a raw key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Letter key: suppress the environment's default action, whether or
    /// not the press was throttled.
    Claimed,
    /// Not a letter: hand the event back to the environment untouched so
    /// system shortcuts keep working.
    PassThrough,
}

/// The countdown for one accepted keystroke. Replaced wholesale on each
/// acceptance; at most one exists at a time.
#[derive(Debug, Clone, Copy)]
struct Countdown {
    total: Duration,
    deadline: Instant,
}

impl Countdown {
    fn new(accepted_at: Instant, total: Duration) -> Self {
        Self {
            total,
            deadline: accepted_at + total,
        }
    }

    /// Remaining cooldown as a percentage: 100 at the accepted instant,
    /// linear down to 0 at the deadline, clamped after. Computed from the
    /// absolute deadline so any polling rate is drift-free.
    fn progress(&self, now: Instant) -> f64 {
        if now >= self.deadline {
            return 0.0;
        }
        let remaining = self.deadline.duration_since(now);
        (remaining.as_secs_f64() / self.total.as_secs_f64() * 100.0).clamp(0.0, 100.0)
    }
}

/// Render-state snapshot consumed by the presentation layer. This is the
/// dispatcher's entire outward API surface.
#[derive(Debug, Clone, Copy)]
pub struct RenderState<'a> {
    /// Most recently accepted entry; `None` until the first keystroke.
    pub displayed: Option<&'a VocabularyEntry>,
    pub language: Language,
    pub cooldown_active: bool,
    /// Countdown progress, 100 → 0.
    pub progress: f64,
}

/// Input debounce and pronunciation dispatcher.
pub struct KeyDispatcher {
    vocabulary: Arc<Vocabulary>,
    speech: Arc<dyn SpeechService>,
    cooldown: Duration,
    language: Language,
    displayed: Option<VocabularyEntry>,
    last_accepted: Option<Instant>,
    countdown: Option<Countdown>,
}

impl KeyDispatcher {
    pub fn new(
        vocabulary: Arc<Vocabulary>,
        speech: Arc<dyn SpeechService>,
        cooldown: Duration,
        language: Language,
    ) -> Self {
        Self {
            vocabulary,
            speech,
            cooldown,
            language,
            displayed: None,
            last_accepted: None,
            countdown: None,
        }
    }

    /// Handle one raw key-down event.
    ///
    /// Non-letters pass through with no side effects. Letters are always
    /// claimed; inside the cooldown window the claim is the only effect.
    pub fn handle_key_press(&mut self, raw: char, now: Instant) -> KeyOutcome {
        let key = raw.to_ascii_uppercase();
        if !key.is_ascii_uppercase() {
            return KeyOutcome::PassThrough;
        }

        if let Some(last) = self.last_accepted {
            if now.duration_since(last) < self.cooldown {
                tracing::trace!("Dropping {} inside cooldown window", key);
                return KeyOutcome::Claimed;
            }
        }

        // Accepted: any live countdown is superseded before the keystroke
        // time is recorded, mirroring the timer reset order of the UI.
        self.countdown = None;
        self.last_accepted = Some(now);

        let Some(entry) = self.vocabulary.get(key) else {
            // Unreachable with a complete A-Z table, but never crash the kiosk.
            tracing::warn!("No vocabulary entry for {}", key);
            return KeyOutcome::Claimed;
        };
        let entry = entry.clone();

        let phrase = entry.translation(self.language).pronunciation.clone();
        tracing::info!(
            "Accepted {} ({:?}): {:?}",
            key,
            self.language,
            entry.translation(self.language).display_word
        );

        self.displayed = Some(entry);
        self.speech.speak(&phrase, self.language);
        self.countdown = Some(Countdown::new(now, self.cooldown));

        KeyOutcome::Claimed
    }

    /// Advance the three-language rotation. Takes effect for the next
    /// keystroke and re-render; never re-speaks the displayed entry.
    pub fn cycle_language(&mut self) {
        self.language = self.language.next();
        tracing::debug!("Language switched to {:?}", self.language);
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn displayed(&self) -> Option<&VocabularyEntry> {
        self.displayed.as_ref()
    }

    /// Countdown progress in `[0, 100]`; 0 whenever no countdown is live.
    pub fn countdown_progress(&self, now: Instant) -> f64 {
        self.countdown.map_or(0.0, |c| c.progress(now))
    }

    /// Retire an expired countdown. Called by the host at tick cadence so
    /// the cooldown indicator stops itself.
    pub fn tick(&mut self, now: Instant) {
        if let Some(countdown) = self.countdown {
            if now >= countdown.deadline {
                self.countdown = None;
            }
        }
    }

    /// Snapshot for the presentation layer.
    pub fn render_state(&self, now: Instant) -> RenderState<'_> {
        let progress = self.countdown_progress(now);
        RenderState {
            displayed: self.displayed.as_ref(),
            language: self.language,
            cooldown_active: self.countdown.is_some() && progress > 0.0,
            progress,
        }
    }
}
