/*!
 * Error types for the srtq application.
 *
 * Parsing and querying failures are described by `SubtitleError`, a failed
 * file parse keeps its partial result in `ParseFailure`, and `AppError`
 * wraps everything the command-line driver can report.
 */

use thiserror::Error;

use crate::subtitle_processor::SubtitleEntry;

/// Errors that can occur while parsing subtitles or queries
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// Timestamp is not `hh:mm:ss[,mmm]` made of non-negative integers
    #[error("malformed timestamp: {0}")]
    MalformedTimestamp(String),

    /// Index line is not made of ASCII digits only
    #[error("invalid index: {0}")]
    InvalidIndex(String),

    /// Range line does not have exactly two sides around ` --> `
    #[error("invalid time range: {0}")]
    InvalidRange(String),

    /// Input ended right after an index line
    #[error("invalid input: no time range after index {index}")]
    TruncatedEntry {
        /// Index of the incomplete entry
        index: u64,
    },

    /// Entry has no text lines
    #[error("invalid input: no text for entry {index}")]
    EmptyText {
        /// Index of the empty entry
        index: u64,
    },

    /// First line carries the offset prefix but no valid integer
    #[error("invalid offset directive: {0}")]
    InvalidOffsetDirective(String),

    /// Query is not `mm:ss`
    #[error("malformed query: {0}")]
    MalformedQuery(String),

    /// Underlying read failure
    #[error("read error: {0}")]
    Io(#[from] std::io::Error),
}

impl SubtitleError {
    /// Whether lenient parsing may skip past this error and keep going
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::MalformedTimestamp(_)
                | Self::InvalidIndex(_)
                | Self::InvalidRange(_)
                | Self::EmptyText { .. }
        )
    }
}

/// A file parse that stopped on a hard error.
///
/// The entries read before the error are kept so callers can still inspect them.
#[derive(Error, Debug)]
#[error("{error} (after {} parsed entries)", .entries.len())]
pub struct ParseFailure {
    /// Entries successfully read before the failure
    pub entries: Vec<SubtitleEntry>,

    /// The error that stopped parsing
    #[source]
    pub error: SubtitleError,
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Invalid configuration
    #[error("Config error: {0}")]
    Config(String),

    /// Error from subtitle or query parsing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Subtitle file could not be parsed
    #[error("Parse error: {0}")]
    Parse(#[from] ParseFailure),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
