//! Application configuration value object

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default autosave period for the crash-recovery draft
pub const DEFAULT_AUTOSAVE_SECS: u64 = 3;

/// Default duration/metering tick period in milliseconds
pub const DEFAULT_TICK_MS: u64 = 100;

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Enable streaming transcription while recording
    pub realtime: Option<bool>,
    /// Translation target language (BCP-47 tag); implies realtime
    pub target_language: Option<String>,
    /// Also translate in-flight partial segments, not just committed ones
    pub translate_partials: Option<bool>,
    /// Draft autosave period in seconds
    pub autosave_secs: Option<u64>,
    /// Duration/metering tick period in milliseconds
    pub tick_ms: Option<u64>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            realtime: Some(false),
            target_language: None,
            translate_partials: Some(false),
            autosave_secs: Some(DEFAULT_AUTOSAVE_SECS),
            tick_ms: Some(DEFAULT_TICK_MS),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            realtime: other.realtime.or(self.realtime),
            target_language: other.target_language.or(self.target_language),
            translate_partials: other.translate_partials.or(self.translate_partials),
            autosave_secs: other.autosave_secs.or(self.autosave_secs),
            tick_ms: other.tick_ms.or(self.tick_ms),
        }
    }

    pub fn realtime_or_default(&self) -> bool {
        self.realtime.unwrap_or(false) || self.target_language.is_some()
    }

    pub fn translate_partials_or_default(&self) -> bool {
        self.translate_partials.unwrap_or(false)
    }

    pub fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.autosave_secs.unwrap_or(DEFAULT_AUTOSAVE_SECS).max(1))
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms.unwrap_or(DEFAULT_TICK_MS).max(10))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_prefers_other() {
        let base = AppConfig::defaults();
        let override_cfg = AppConfig {
            realtime: Some(true),
            autosave_secs: Some(10),
            ..AppConfig::empty()
        };
        let merged = base.merge(override_cfg);
        assert_eq!(merged.realtime, Some(true));
        assert_eq!(merged.autosave_secs, Some(10));
        assert_eq!(merged.tick_ms, Some(DEFAULT_TICK_MS));
    }

    #[test]
    fn target_language_implies_realtime() {
        let config = AppConfig {
            target_language: Some("es".into()),
            ..AppConfig::empty()
        };
        assert!(config.realtime_or_default());
    }

    #[test]
    fn intervals_have_sane_floors() {
        let config = AppConfig {
            autosave_secs: Some(0),
            tick_ms: Some(0),
            ..AppConfig::empty()
        };
        assert_eq!(config.autosave_interval(), Duration::from_secs(1));
        assert_eq!(config.tick_interval(), Duration::from_millis(10));
    }

    #[test]
    fn toml_round_trip() {
        let config = AppConfig::defaults();
        let text = toml::to_string(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.autosave_secs, config.autosave_secs);
        assert_eq!(parsed.realtime, config.realtime);
    }
}
