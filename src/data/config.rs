//! Application Configuration
//!
//! Handles loading and saving application configuration.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use super::vocabulary::Language;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
}

impl AppConfig {
    /// Get the config file path
    pub fn config_path() -> PathBuf {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."));
        exe_dir.join("config.toml")
    }

    /// Load configuration from file or create default
    pub fn load_or_default() -> Result<Self> {
        let path = Self::config_path();

        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: AppConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = AppConfig::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }
}

/// General configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Language active at startup: "english", "french" or "mandarin".
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "english".to_string()
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
        }
    }
}

impl GeneralConfig {
    /// Resolve the configured startup language, falling back to English on
    /// an unrecognized value.
    pub fn startup_language(&self) -> Language {
        Language::from_config_name(&self.language).unwrap_or_else(|| {
            tracing::warn!(
                "Unknown language {:?} in config, falling back to english",
                self.language
            );
            Language::English
        })
    }
}

/// Keyboard input configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Minimum interval between accepted letter keys, in milliseconds.
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,
    /// Countdown redraw granularity, in milliseconds.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

fn default_cooldown_ms() -> u64 {
    5000
}

fn default_tick_ms() -> u64 {
    50
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: default_cooldown_ms(),
            tick_ms: default_tick_ms(),
        }
    }
}

impl InputConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(10))
    }
}

fn default_true() -> bool {
    true
}

/// Speech configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_kiosk_expectations() {
        let config = AppConfig::default();
        assert_eq!(config.input.cooldown_ms, 5000);
        assert_eq!(config.input.tick_ms, 50);
        assert_eq!(config.general.language, "english");
        assert!(config.speech.enabled);
    }

    #[test]
    fn empty_toml_fills_every_section() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.input.cooldown(), Duration::from_millis(5000));
        assert_eq!(config.general.startup_language(), Language::English);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config: AppConfig = toml::from_str(
            "[general]\nlanguage = \"french\"\n\n[input]\ncooldown_ms = 2000\n",
        )
        .unwrap();
        assert_eq!(config.general.startup_language(), Language::French);
        assert_eq!(config.input.cooldown_ms, 2000);
        assert_eq!(config.input.tick_ms, 50);
    }

    #[test]
    fn unknown_language_falls_back_to_english() {
        let general = GeneralConfig {
            language: "esperanto".into(),
        };
        assert_eq!(general.startup_language(), Language::English);
    }
}
