//! Platform speech backends
//!
//! Each backend wraps the operating system's text-to-speech command
//! (`say` on macOS, `espeak-ng` on Linux). When no command is available
//! the factory falls back to a silent backend: the kiosk keeps rendering
//! letters, it just makes no sound.

use std::process::{Child, Command, Stdio};
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;

use crate::speech::VoiceInfo;

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("speech command not found: {0}")]
    CommandNotFound(&'static str),
    #[error("failed to run speech command: {0}")]
    Io(#[from] std::io::Error),
    #[error("speech command exited with status {0:?}")]
    Failed(Option<i32>),
}

/// Trait for platform-specific speech synthesis
pub trait SpeechBackend: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &'static str;
    /// List the installed voices
    fn voices(&self) -> Vec<VoiceInfo>;
    /// Speak one utterance. Blocks until it finishes or is cancelled.
    fn speak(&self, text: &str, voice: &VoiceInfo) -> Result<(), SpeechError>;
    /// Stop any in-progress utterance. Always safe to call.
    fn cancel(&self);
}

#[cfg(target_os = "macos")]
pub mod macos;

#[cfg(target_os = "linux")]
pub mod linux;

/// Factory for creating platform-specific implementations
pub struct PlatformFactory;

impl PlatformFactory {
    /// Create the best available speech backend for this platform.
    pub fn create_speech_backend() -> Box<dyn SpeechBackend> {
        #[cfg(target_os = "macos")]
        match macos::SayBackend::probe() {
            Ok(backend) => return Box::new(backend),
            Err(e) => tracing::warn!("say unavailable, speech disabled: {}", e),
        }

        #[cfg(target_os = "linux")]
        match linux::EspeakBackend::probe() {
            Ok(backend) => return Box::new(backend),
            Err(e) => tracing::warn!("espeak-ng unavailable, speech disabled: {}", e),
        }

        Box::new(NullBackend)
    }
}

/// Silent backend used when no speech command is installed.
pub struct NullBackend;

impl SpeechBackend for NullBackend {
    fn name(&self) -> &'static str {
        "null"
    }

    fn voices(&self) -> Vec<VoiceInfo> {
        Vec::new()
    }

    fn speak(&self, text: &str, _voice: &VoiceInfo) -> Result<(), SpeechError> {
        tracing::trace!("Null backend dropping utterance: {:?}", text);
        Ok(())
    }

    fn cancel(&self) {}
}

/// Holds the child process of the utterance currently playing, so a new
/// utterance (or an explicit cancel) can kill it before starting.
pub(crate) struct CurrentUtterance {
    child: Mutex<Option<Child>>,
}

impl CurrentUtterance {
    pub(crate) fn new() -> Self {
        Self {
            child: Mutex::new(None),
        }
    }

    /// Spawn the command and wait for it, polling so a concurrent
    /// `cancel()` can take and kill the child without deadlocking.
    pub(crate) fn run(&self, mut command: Command) -> Result<(), SpeechError> {
        let child = command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        if let Ok(mut slot) = self.child.lock() {
            // A previous utterance still in the slot was already killed or
            // finished; replace it unconditionally.
            *slot = Some(child);
        }

        loop {
            let status = {
                let Ok(mut slot) = self.child.lock() else {
                    return Ok(());
                };
                match slot.as_mut() {
                    Some(child) => match child.try_wait() {
                        Ok(status) => status,
                        Err(e) => {
                            slot.take();
                            return Err(SpeechError::Io(e));
                        }
                    },
                    // Slot emptied by cancel(); the utterance was killed.
                    None => return Ok(()),
                }
            };

            match status {
                Some(status) => {
                    if let Ok(mut slot) = self.child.lock() {
                        slot.take();
                    }
                    if status.success() {
                        return Ok(());
                    }
                    return Err(SpeechError::Failed(status.code()));
                }
                None => std::thread::sleep(Duration::from_millis(20)),
            }
        }
    }

    pub(crate) fn cancel(&self) {
        if let Ok(mut slot) = self.child.lock() {
            if let Some(mut child) = slot.take() {
                let _ = child.kill();
                let _ = child.wait();
            }
        }
    }
}

/// Map a spawn error to a friendlier "command not found" variant.
pub(crate) fn probe_command(program: &'static str, args: &[&str]) -> Result<(), SpeechError> {
    Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SpeechError::CommandNotFound(program)
            } else {
                SpeechError::Io(e)
            }
        })?;
    Ok(())
}
