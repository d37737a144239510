/*!
 * Tests for error types and conversions
 */

use srtq::errors::{AppError, ParseFailure, SubtitleError};
use srtq::subtitle_processor::SubtitleEntry;
use std::error::Error;

#[test]
fn test_subtitleError_malformedTimestamp_shouldDisplayOffendingInput() {
    let error = SubtitleError::MalformedTimestamp("00:61".to_string());
    let display = format!("{}", error);
    assert!(display.contains("malformed timestamp"));
    assert!(display.contains("00:61"));
}

#[test]
fn test_subtitleError_entryErrors_shouldDisplayIndex() {
    let display = format!("{}", SubtitleError::TruncatedEntry { index: 17 });
    assert!(display.contains("no time range"));
    assert!(display.contains("17"));

    let display = format!("{}", SubtitleError::EmptyText { index: 4 });
    assert!(display.contains("no text"));
    assert!(display.contains('4'));
}

#[test]
fn test_subtitleError_isRecoverable_shouldOnlyCoverEntryContent() {
    assert!(SubtitleError::InvalidIndex("x".to_string()).is_recoverable());
    assert!(SubtitleError::InvalidRange("x".to_string()).is_recoverable());
    assert!(SubtitleError::MalformedTimestamp("x".to_string()).is_recoverable());
    assert!(SubtitleError::EmptyText { index: 1 }.is_recoverable());

    assert!(!SubtitleError::TruncatedEntry { index: 1 }.is_recoverable());
    assert!(!SubtitleError::InvalidOffsetDirective("OFFSET:x".to_string()).is_recoverable());
    assert!(!SubtitleError::MalformedQuery("x".to_string()).is_recoverable());
    let io = std::io::Error::new(std::io::ErrorKind::InvalidData, "bad bytes");
    assert!(!SubtitleError::from(io).is_recoverable());
}

#[test]
fn test_parseFailure_display_shouldIncludeCauseAndPartialCount() {
    let failure = ParseFailure {
        entries: vec![SubtitleEntry::new(1, 0, 1000, "Kept".to_string())],
        error: SubtitleError::InvalidIndex("12a".to_string()),
    };

    let display = format!("{}", failure);
    assert!(display.contains("invalid index: 12a"));
    assert!(display.contains("after 1 parsed entries"));
    assert!(failure.source().is_some());
}

#[test]
fn test_appError_fromSubtitleError_shouldWrapCorrectly() {
    let app_error: AppError = SubtitleError::MalformedQuery("soon".to_string()).into();
    let display = format!("{}", app_error);
    assert!(display.contains("Subtitle error"));
    assert!(display.contains("malformed query: soon"));
}

#[test]
fn test_appError_fromParseFailure_shouldKeepPartialEntries() {
    let failure = ParseFailure {
        entries: vec![SubtitleEntry::new(1, 0, 1000, "Kept".to_string())],
        error: SubtitleError::TruncatedEntry { index: 2 },
    };

    match AppError::from(failure) {
        AppError::Parse(failure) => assert_eq!(failure.entries.len(), 1),
        other => panic!("expected AppError::Parse, got {:?}", other),
    }
}

#[test]
fn test_appError_fromIoError_shouldBecomeFileError() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let app_error: AppError = io_error.into();
    let display = format!("{}", app_error);
    assert!(display.contains("File error"));
    assert!(display.contains("file not found"));
}

#[test]
fn test_appError_fromAnyhow_shouldBecomeUnknown() {
    let app_error: AppError = anyhow::anyhow!("something odd").into();
    assert!(matches!(app_error, AppError::Unknown(ref message) if message == "something odd"));
}
