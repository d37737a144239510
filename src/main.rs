// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::{IsTerminal, Write};
use std::path::PathBuf;

use srtq::app_config::{self, Config};
use srtq::Controller;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// srtq - show the subtitle on screen at a given playback time
#[derive(Parser, Debug)]
#[command(name = "srtq")]
#[command(version)]
#[command(about = "Show which SRT subtitle is on screen at a playback time")]
#[command(long_about = "srtq loads an SRT subtitle file and prints the text of every entry
showing at the requested time, with one second of slack on either side.

The time comes from the MM:SS argument, from a single line on piped stdin,
or from a prompt loop when stdin is a terminal. A blank line or end of input
ends the session.

If the first line of the file is OFFSET:<ms>, that offset replaces --offset.

EXAMPLES:
    srtq movie.srt 05:30                 # One lookup
    echo 05:30 | srtq movie.srt          # Piped lookup
    srtq --offset -500 movie.srt         # Interactive, subtitles 0.5s earlier
    mpc status '%currenttime%' | srtq lyrics.srt")]
struct CommandLineOptions {
    /// Subtitle file to load
    #[arg(value_name = "FILE")]
    subtitle_file: PathBuf,

    /// Playback time to look up, as MM:SS
    #[arg(value_name = "MM:SS")]
    query: Option<String>,

    /// Global offset in milliseconds, in case the file does not match the video
    #[arg(short, long, env = "SRTQ_OFFSET", allow_negative_numbers = true)]
    offset: Option<i64>,

    /// Slack in milliseconds on both sides of each subtitle
    #[arg(short, long)]
    tolerance: Option<i64>,

    /// Skip malformed entries instead of failing
    #[arg(long)]
    lenient: bool,

    /// Prompt shown before each interactive read
    #[arg(long)]
    prompt: Option<String>,

    /// Configuration file path (JSON)
    #[arg(short, long = "config", value_name = "PATH", env = "SRTQ_CONFIG")]
    config_path: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
    colored: bool,
}

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger {
            level,
            colored: std::io::stderr().is_terminal(),
        });
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour code and label for level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "ERROR"),
            Level::Warn => ("1;33", "WARN"),
            Level::Info => ("1;32", "INFO"),
            Level::Debug => ("1;36", "DEBUG"),
            Level::Trace => ("1;35", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, label) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = if self.colored {
                writeln!(stderr, "\x1B[{}m{} {:<5} {}\x1B[0m", color, now, label, record.args())
            } else {
                writeln!(stderr, "{} {:<5} {}", now, label, record.args())
            };
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Everything is allowed through the logger; the max level does the filtering
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(app_config::LogLevel::default().to_level_filter());

    // Usage errors exit with 1 instead of clap's default 2
    let cli = match CommandLineOptions::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            std::process::exit(code);
        }
    };

    run(cli)
}

fn run(options: CommandLineOptions) -> Result<()> {
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = match &options.config_path {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    // Override config with CLI options if provided
    if let Some(offset) = options.offset {
        config.offset_ms = offset;
    }
    if let Some(tolerance) = options.tolerance {
        config.tolerance_ms = tolerance;
    }
    if let Some(prompt) = options.prompt {
        config.prompt = prompt;
    }
    if options.lenient {
        config.lenient = true;
    }
    if let Some(log_level) = options.log_level {
        config.log_level = log_level.into();
    }
    log::set_max_level(config.log_level.to_level_filter());

    let controller = Controller::with_config(config).context("Configuration validation failed")?;

    controller
        .run(&options.subtitle_file, options.query)
        .with_context(|| format!("Failed to query {}", options.subtitle_file.display()))?;

    Ok(())
}
