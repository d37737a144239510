use anyhow::{Context, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::errors::AppError;
use crate::query::DEFAULT_TOLERANCE_MS;

/// Application configuration module
/// This module handles loading and validating the query settings.
/// Command-line flags are applied on top by the binary.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Offset in ms applied to every entry, unless the file declares its own
    #[serde(default)]
    pub offset_ms: i64,

    /// Slack in ms on both sides of each entry's interval
    #[serde(default = "default_tolerance_ms")]
    pub tolerance_ms: i64,

    /// Text written before each interactive read
    #[serde(default = "default_prompt")]
    pub prompt: String,

    /// Skip malformed entries instead of failing the whole file
    #[serde(default)]
    pub lenient: bool,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching filter for the log facade
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn default_tolerance_ms() -> i64 {
    DEFAULT_TOLERANCE_MS
}

fn default_prompt() -> String {
    "Input timestamp: ".to_string()
}

impl Config {
    /// Load a JSON configuration file; missing fields take their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Validate the configuration for consistency
    pub fn validate(&self) -> Result<(), AppError> {
        if self.tolerance_ms < 0 {
            return Err(AppError::Config(format!(
                "tolerance must not be negative, got {} ms",
                self.tolerance_ms
            )));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            offset_ms: 0,
            tolerance_ms: default_tolerance_ms(),
            prompt: default_prompt(),
            lenient: false,
            log_level: LogLevel::default(),
        }
    }
}
