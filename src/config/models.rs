use readaloud_core::{
    MAX_SPEECH_RATE, MIN_SPEECH_RATE, PlatformClass, PlaybackProfile, ProfileOverrides,
    VoiceSettings,
};
use serde::Deserialize;

/// Flattened runner configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub log_level: LogLevel,
    pub platform: PlatformClass,
    pub voice: Option<String>,
    pub rate: f32,
    /// Speaking speed the simulated engine assumes at rate 1.0.
    pub words_per_minute: u32,
    pub pacing: ProfileOverrides,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            log_level: crate::config::defaults::default_log_level(),
            platform: PlatformClass::default(),
            voice: None,
            rate: crate::config::defaults::default_rate(),
            words_per_minute: crate::config::defaults::default_words_per_minute(),
            pacing: ProfileOverrides::default(),
        }
    }
}

impl AppConfig {
    /// Clamp values the engine cannot honour.
    pub fn normalized(mut self) -> Self {
        self.rate = if self.rate.is_finite() {
            self.rate.clamp(MIN_SPEECH_RATE, MAX_SPEECH_RATE)
        } else {
            crate::config::defaults::default_rate()
        };
        self.words_per_minute = self.words_per_minute.max(1);
        self.voice = self.voice.filter(|voice| !voice.trim().is_empty());
        self
    }

    pub fn profile(&self) -> PlaybackProfile {
        PlaybackProfile::for_platform(self.platform).with_overrides(&self.pacing)
    }

    pub fn voice_settings(&self) -> VoiceSettings {
        VoiceSettings {
            voice: self.voice.clone(),
            rate: self.rate,
        }
    }
}

/// Supported logging verbosity levels.
#[derive(Debug, Clone, Copy, Deserialize, serde::Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_filter_str())
    }
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
