/*!
 * # srtq - SRT subtitle queries
 *
 * A Rust library for answering "which subtitle is showing at time T"
 * against SRT subtitle files.
 *
 * ## Features
 *
 * - Strict SRT parsing with precise error reporting
 * - Optional lenient mode that skips malformed entries
 * - `OFFSET:<ms>` directive on the first line of a file
 * - Tolerant interval matching (±1000 ms by default)
 * - Argument, piped and interactive query modes
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `subtitle_processor`: Timestamp, entry and file parsing
 * - `query`: Query-time parsing and the matching engine
 * - `app_config`: Configuration management
 * - `file_utils`: File loading
 * - `app_controller`: Query-mode selection and drivers
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod query;
pub mod subtitle_processor;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, QueryMode};
pub use errors::{AppError, ParseFailure, SubtitleError};
pub use subtitle_processor::{parse_subtitles, parse_timestamp, ParseOptions, SubtitleEntry, SubtitleFile};
pub use query::{find_matches, parse_query, DEFAULT_TOLERANCE_MS};
