//! Configuration loading for the read-aloud runner.
//!
//! Settings are read from `conf/config.toml` if present. Missing or invalid
//! entries fall back to defaults so playback can still start.

mod defaults;
mod io;
mod models;
mod tables;

pub use io::{load_config, parse_config};
pub use models::{AppConfig, LogLevel};
