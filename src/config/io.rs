use super::models::AppConfig;
use super::tables::ConfigTables;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Load configuration from the given path, falling back to defaults on error.
pub fn load_config(path: &Path) -> AppConfig {
    let contents = match fs::read_to_string(path) {
        Ok(data) => {
            info!(path = %path.display(), "Loaded base config");
            data
        }
        Err(err) => {
            warn!(
                path = %path.display(),
                "Falling back to default config: {err}"
            );
            return AppConfig::default();
        }
    };

    match parse_config(&contents) {
        Ok(cfg) => {
            debug!("Parsed configuration from disk");
            cfg
        }
        Err(err) => {
            warn!(path = %path.display(), "Invalid config TOML: {err:#}");
            AppConfig::default()
        }
    }
}

pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let tables: ConfigTables = toml::from_str(contents).context("Failed to parse config")?;
    Ok(tables.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogLevel;
    use readaloud_core::PlatformClass;
    use std::time::Duration;

    #[test]
    fn empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn reads_sectioned_tables() {
        let config = parse_config(
            r#"
[logging]
log_level = "debug"

[speech]
platform = "mobile"
voice = "en-GB"
rate = 1.25
words_per_minute = 200

[pacing]
paragraph_pause_ms = 400
resume_watchdog_ms = 5000
"#,
        )
        .unwrap();
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.platform, PlatformClass::Mobile);
        assert_eq!(config.voice.as_deref(), Some("en-GB"));
        assert_eq!(config.words_per_minute, 200);

        let profile = config.profile();
        assert_eq!(profile.max_unit_chars, 180);
        assert_eq!(profile.paragraph_pause, Duration::from_millis(400));
        assert_eq!(profile.resume_watchdog, Some(Duration::from_millis(5000)));
    }

    #[test]
    fn out_of_range_rate_is_clamped() {
        let config = parse_config("[speech]\nrate = 40.0\n").unwrap();
        assert_eq!(config.rate, 10.0);
        let config = parse_config("[speech]\nrate = 0.0\n").unwrap();
        assert_eq!(config.rate, 0.1);
    }

    #[test]
    fn invalid_toml_is_an_error_and_missing_file_falls_back() {
        assert!(parse_config("[speech\nrate = ").is_err());
        let config = load_config(Path::new("/nonexistent/readaloud/config.toml"));
        assert_eq!(config, AppConfig::default());
    }
}
