//! Entry point for the read-aloud runner.
//!
//! Responsibilities here are intentionally minimal:
//! - Parse command-line arguments.
//! - Load user configuration from `conf/config.toml`.
//! - Load the book directory.
//! - Drive the playback loop, feeding it commands from stdin.

mod commands;
mod config;
mod runtime;
mod sink;
mod speech;

use crate::commands::{Command, HELP, chapter_number, parse_command};
use crate::config::{AppConfig, load_config};
use crate::runtime::{Control, EffectRuntime, message_channel};
use crate::sink::{ConsoleSink, JsonLinesSink};
use crate::speech::SimulatedSpeech;
use anyhow::{Context, Result, anyhow};
use readaloud_core::{
    Book, Message, PlatformClass, PlaybackController, PositionSink, load_book,
};
use std::env;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

type ReloadHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

const USAGE: &str = "Usage: readaloud <book-dir> [--chapter N] [--platform standard|chromium|mobile] \
[--json] [--no-autoplay] [--config PATH]";

#[derive(Debug, Clone, PartialEq)]
struct CliArgs {
    book_dir: PathBuf,
    chapter: Option<usize>,
    platform: Option<PlatformClass>,
    json: bool,
    autoplay: bool,
    config_path: PathBuf,
}

fn main() {
    let reload_handle = init_tracing();
    if let Err(err) = run(&reload_handle) {
        error!("{err:?}");
        std::process::exit(1);
    }
}

fn run(reload_handle: &ReloadHandle) -> Result<()> {
    let args = parse_args(env::args().skip(1))?;
    let mut config = load_config(&args.config_path);
    if let Some(platform) = args.platform {
        config.platform = platform;
    }
    set_log_level(reload_handle, config.log_level.as_filter_str());
    info!(
        path = %args.book_dir.display(),
        level = %config.log_level,
        platform = %config.platform,
        "Starting read-aloud runner"
    );

    let book = load_book(&args.book_dir)?;
    if let Some(chapter) = args.chapter {
        if chapter >= book.chapter_count() {
            return Err(anyhow!(
                "Chapter {} does not exist; the book has {}",
                chapter + 1,
                book.chapter_count()
            ));
        }
    }

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;

    let result = if args.json {
        let sink = JsonLinesSink::new(std::io::stdout());
        rt.block_on(read_aloud(book, &config, &args, sink))
    } else {
        let sink = ConsoleSink::new(book.clone(), std::io::stdout());
        rt.block_on(read_aloud(book, &config, &args, sink))
    };
    // The stdin reader may still be parked in a blocking read.
    rt.shutdown_background();
    result
}

async fn read_aloud<P: PositionSink>(
    book: Book,
    config: &AppConfig,
    args: &CliArgs,
    sink: P,
) -> Result<()> {
    let profile = config.profile();
    info!(
        max_unit_chars = profile.max_unit_chars,
        submit_delay_ms = profile.submit_delay.as_millis() as u64,
        settle_delay_ms = profile.settle_delay.as_millis() as u64,
        watchdog = profile.resume_watchdog.is_some(),
        "Active playback profile"
    );
    let controller = PlaybackController::new(Book::empty(), profile, config.voice_settings());

    let channel = message_channel();
    let messages = channel.0.clone();
    let speech = SimulatedSpeech::new(messages.clone(), config.words_per_minute);
    let mut runtime = EffectRuntime::new(controller, speech, sink, channel);

    runtime.dispatch(Message::LoadBook(book));
    if let Some(chapter) = args.chapter.filter(|idx| *idx > 0) {
        runtime.dispatch(Message::SwitchChapter(chapter));
    }
    if args.autoplay {
        messages
            .send(Message::Play)
            .map_err(|_| anyhow!("Playback loop closed before start"))?;
    }

    let (control_tx, control_rx) = mpsc::unbounded_channel();
    let ctrlc_tx = control_tx.clone();
    if let Err(err) = ctrlc::set_handler(move || {
        info!("Received Ctrl+C; stopping playback");
        let _ = ctrlc_tx.send(Control::Shutdown);
    }) {
        warn!("Failed to install Ctrl+C signal handler: {err}");
    }

    tokio::spawn(read_commands(messages, control_tx));
    let controller = runtime.run(control_rx).await;
    info!(
        chapter = controller.position().chapter_index,
        paragraph = controller.position().paragraph_index,
        "Stopped"
    );
    Ok(())
}

/// Forward stdin lines to the playback loop until EOF or `quit`.
async fn read_commands(messages: UnboundedSender<Message>, control: UnboundedSender<Control>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                warn!("Failed to read command input: {err}");
                break;
            }
        };
        match parse_command(&line) {
            Ok(Some(Command::Reader(message))) => {
                if messages.send(message).is_err() {
                    return;
                }
            }
            Ok(Some(Command::Quit)) => {
                let _ = control.send(Control::Shutdown);
                return;
            }
            Ok(None) => {}
            Err(err) => warn!("{err:#}; {HELP}"),
        }
    }
    let _ = control.send(Control::InputClosed);
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<CliArgs> {
    let mut book_dir = None;
    let mut chapter = None;
    let mut platform = None;
    let mut json = false;
    let mut autoplay = true;
    let mut config_path = PathBuf::from("conf/config.toml");

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--chapter" => {
                let raw = args.next().ok_or_else(|| anyhow!("--chapter needs a value"))?;
                chapter = Some(chapter_number(&raw)?);
            }
            "--platform" => {
                let raw = args.next().ok_or_else(|| anyhow!("--platform needs a value"))?;
                platform = Some(raw.parse::<PlatformClass>()?);
            }
            "--config" => {
                let raw = args.next().ok_or_else(|| anyhow!("--config needs a value"))?;
                config_path = PathBuf::from(raw);
            }
            "--json" => json = true,
            "--no-autoplay" => autoplay = false,
            "-h" | "--help" => return Err(anyhow!(USAGE)),
            flag if flag.starts_with("--") => {
                return Err(anyhow!("Unknown option {flag}\n{USAGE}"));
            }
            _ if book_dir.is_none() => book_dir = Some(PathBuf::from(arg)),
            _ => return Err(anyhow!("Unexpected argument {arg}\n{USAGE}")),
        }
    }

    let book_dir = book_dir.ok_or_else(|| anyhow!(USAGE))?;
    if !book_dir.is_dir() {
        return Err(anyhow!("Book directory not found: {}", book_dir.display()));
    }
    Ok(CliArgs {
        book_dir,
        chapter,
        platform,
        json,
        autoplay,
        config_path,
    })
}

fn init_tracing() -> ReloadHandle {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let (filter_layer, handle) = reload::Layer::new(env_filter);
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_filter(filter_layer),
        )
        .init();
    handle
}

fn set_log_level(handle: &ReloadHandle, level: &str) {
    if env::var_os("RUST_LOG").is_some() {
        info!("RUST_LOG set; ignoring configured log level");
        return;
    }
    let parsed = EnvFilter::builder()
        .parse(level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(err) = handle.modify(|filter| *filter = parsed) {
        warn!(%level, "Failed to update log level from config: {err}");
    } else {
        info!(%level, "Applied log level from config");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<CliArgs> {
        parse_args(list.iter().map(|arg| arg.to_string()))
    }

    #[test]
    fn parses_flags_around_book_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_string_lossy().to_string();
        let parsed = args(&[
            "--platform",
            "mobile",
            &path,
            "--chapter",
            "2",
            "--json",
            "--no-autoplay",
        ])
        .unwrap();
        assert_eq!(parsed.book_dir, dir.path());
        assert_eq!(parsed.chapter, Some(1));
        assert_eq!(parsed.platform, Some(PlatformClass::Mobile));
        assert!(parsed.json);
        assert!(!parsed.autoplay);
        assert_eq!(parsed.config_path, PathBuf::from("conf/config.toml"));
    }

    #[test]
    fn rejects_missing_or_unknown_arguments() {
        assert!(args(&[]).is_err());
        assert!(args(&["/definitely/not/a/book"]).is_err());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_string_lossy().to_string();
        assert!(args(&[&path, "--speed", "2"]).is_err());
        assert!(args(&[&path, "--platform", "toaster"]).is_err());
        assert!(args(&[&path, "--chapter"]).is_err());
    }
}
