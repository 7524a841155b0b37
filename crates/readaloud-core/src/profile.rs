//! Per-platform pacing and length limits.
//!
//! Speech engines differ in how long an utterance they accept and how they
//! behave right after a cancel. The numbers live here, keyed by platform
//! class, so the sequencing code never hard-codes them.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use ts_rs::TS;

/// Broad class of speech host the profile is tuned for.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum PlatformClass {
    #[default]
    Standard,
    /// Desktop Chromium engines pause long sessions on their own.
    Chromium,
    /// Memory constrained mobile engines.
    Mobile,
}

impl std::fmt::Display for PlatformClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            PlatformClass::Standard => "standard",
            PlatformClass::Chromium => "chromium",
            PlatformClass::Mobile => "mobile",
        };
        write!(f, "{}", label)
    }
}

impl std::str::FromStr for PlatformClass {
    type Err = anyhow::Error;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        match label.trim().to_ascii_lowercase().as_str() {
            "standard" | "desktop" => Ok(PlatformClass::Standard),
            "chromium" | "chrome" => Ok(PlatformClass::Chromium),
            "mobile" => Ok(PlatformClass::Mobile),
            other => Err(anyhow::anyhow!("Unknown platform class: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackProfile {
    pub max_unit_chars: usize,
    /// Wait between cancelling the previous utterance and submitting the next.
    pub submit_delay: Duration,
    /// Wait after an utterance completes before the next unit starts.
    pub settle_delay: Duration,
    pub paragraph_pause: Duration,
    pub section_break_pause: Duration,
    pub chapter_transition_pause: Duration,
    /// Interval for nudging a paused-but-not-stopped engine back to life.
    pub resume_watchdog: Option<Duration>,
}

impl PlaybackProfile {
    pub fn for_platform(class: PlatformClass) -> Self {
        let standard = Self {
            max_unit_chars: 800,
            submit_delay: Duration::from_millis(50),
            settle_delay: Duration::from_millis(100),
            paragraph_pause: Duration::from_millis(250),
            section_break_pause: Duration::from_millis(1500),
            chapter_transition_pause: Duration::from_millis(1000),
            resume_watchdog: None,
        };
        match class {
            PlatformClass::Standard => standard,
            PlatformClass::Chromium => Self {
                resume_watchdog: Some(Duration::from_secs(10)),
                ..standard
            },
            PlatformClass::Mobile => Self {
                max_unit_chars: 180,
                submit_delay: Duration::from_millis(150),
                settle_delay: Duration::from_millis(350),
                paragraph_pause: Duration::from_millis(500),
                ..standard
            },
        }
    }

    pub fn with_overrides(mut self, overrides: &ProfileOverrides) -> Self {
        if let Some(chars) = overrides.max_unit_chars {
            self.max_unit_chars = chars.max(1);
        }
        let ms = |value: Option<u64>| value.map(Duration::from_millis);
        if let Some(delay) = ms(overrides.submit_delay_ms) {
            self.submit_delay = delay;
        }
        if let Some(delay) = ms(overrides.settle_delay_ms) {
            self.settle_delay = delay;
        }
        if let Some(delay) = ms(overrides.paragraph_pause_ms) {
            self.paragraph_pause = delay;
        }
        if let Some(delay) = ms(overrides.section_break_pause_ms) {
            self.section_break_pause = delay;
        }
        if let Some(delay) = ms(overrides.chapter_transition_pause_ms) {
            self.chapter_transition_pause = delay;
        }
        match overrides.resume_watchdog_ms {
            Some(0) => self.resume_watchdog = None,
            Some(interval) => self.resume_watchdog = Some(Duration::from_millis(interval)),
            None => {}
        }
        self
    }
}

impl Default for PlaybackProfile {
    fn default() -> Self {
        Self::for_platform(PlatformClass::default())
    }
}

/// Optional per-field replacements for a platform profile, in milliseconds.
/// A watchdog interval of `0` disables the watchdog.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ProfileOverrides {
    #[serde(default)]
    pub max_unit_chars: Option<usize>,
    #[serde(default)]
    pub submit_delay_ms: Option<u64>,
    #[serde(default)]
    pub settle_delay_ms: Option<u64>,
    #[serde(default)]
    pub paragraph_pause_ms: Option<u64>,
    #[serde(default)]
    pub section_break_pause_ms: Option<u64>,
    #[serde(default)]
    pub chapter_transition_pause_ms: Option<u64>,
    #[serde(default)]
    pub resume_watchdog_ms: Option<u64>,
}
