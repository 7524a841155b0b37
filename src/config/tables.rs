use super::defaults;
use super::models::{AppConfig, LogLevel};
use readaloud_core::{PlatformClass, ProfileOverrides};
use serde::Deserialize;

/// On-disk layout: one TOML table per concern.
#[derive(Debug, Clone, Default, Deserialize)]
pub(super) struct ConfigTables {
    #[serde(default)]
    logging: LoggingConfig,
    #[serde(default)]
    speech: SpeechConfig,
    #[serde(default)]
    pacing: ProfileOverrides,
}

impl From<ConfigTables> for AppConfig {
    fn from(tables: ConfigTables) -> Self {
        AppConfig {
            log_level: tables.logging.log_level,
            platform: tables.speech.platform,
            voice: tables.speech.voice,
            rate: tables.speech.rate,
            words_per_minute: tables.speech.words_per_minute,
            pacing: tables.pacing,
        }
        .normalized()
    }
}

#[derive(Debug, Clone, Deserialize)]
struct LoggingConfig {
    #[serde(default = "defaults::default_log_level")]
    log_level: LogLevel,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            log_level: defaults::default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct SpeechConfig {
    #[serde(default)]
    platform: PlatformClass,
    #[serde(default)]
    voice: Option<String>,
    #[serde(default = "defaults::default_rate")]
    rate: f32,
    #[serde(default = "defaults::default_words_per_minute")]
    words_per_minute: u32,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        SpeechConfig {
            platform: PlatformClass::default(),
            voice: None,
            rate: defaults::default_rate(),
            words_per_minute: defaults::default_words_per_minute(),
        }
    }
}
