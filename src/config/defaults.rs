use super::models::LogLevel;

pub(crate) fn default_log_level() -> LogLevel {
    LogLevel::Info
}

pub(crate) fn default_rate() -> f32 {
    1.0
}

pub(crate) fn default_words_per_minute() -> u32 {
    180
}
