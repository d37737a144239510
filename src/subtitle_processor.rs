use std::fmt;
use std::io::{BufRead, Lines};
use regex::Regex;
use once_cell::sync::Lazy;
use log::{debug, info, warn};

use crate::errors::{ParseFailure, SubtitleError};

// @module: SRT parsing into ordered subtitle entries

// @const: Index line, digits only
static INDEX_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]+$").expect("index regex is valid")
});

// @const: Offset directive, first line only
static OFFSET_DIRECTIVE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^OFFSET:(.*)$").expect("offset directive regex is valid")
});

/// Separator between the start and end timestamps of a range line
pub const RANGE_SEPARATOR: &str = " --> ";

const BYTE_ORDER_MARK: char = '\u{feff}';

// @struct: Single subtitle entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleEntry {
    // @field: Sequence number as declared in the file
    pub index: u64,

    // @field: Start time in ms
    pub start_ms: i64,

    // @field: End time in ms
    pub end_ms: i64,

    // @field: Newline-joined text lines
    pub text: String,
}

impl SubtitleEntry {
    pub fn new(index: u64, start_ms: i64, end_ms: i64, text: String) -> Self {
        SubtitleEntry {
            index,
            start_ms,
            end_ms,
            text,
        }
    }

    /// Convert start time to formatted SRT timestamp
    pub fn format_start_time(&self) -> String {
        format_timestamp(self.start_ms)
    }

    /// Convert end time to formatted SRT timestamp
    pub fn format_end_time(&self) -> String {
        format_timestamp(self.end_ms)
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.index)?;
        writeln!(f, "{}{}{}", self.format_start_time(), RANGE_SEPARATOR, self.format_end_time())?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Parsed subtitle file: the entries plus the offset directive, if any
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubtitleFile {
    /// Entries in file order
    pub entries: Vec<SubtitleEntry>,

    /// Value of a leading `OFFSET:` line
    pub offset_directive: Option<i64>,
}

impl SubtitleFile {
    pub fn new(entries: Vec<SubtitleEntry>, offset_directive: Option<i64>) -> Self {
        SubtitleFile {
            entries,
            offset_directive,
        }
    }

    /// Offset to apply at query time; the in-file directive wins over `default_offset_ms`
    pub fn effective_offset(&self, default_offset_ms: i64) -> i64 {
        self.offset_directive.unwrap_or(default_offset_ms)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for SubtitleFile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(offset) = self.offset_directive {
            writeln!(f, "OFFSET:{}", offset)?;
        }
        for entry in &self.entries {
            write!(f, "{}", entry)?;
        }
        Ok(())
    }
}

/// Parsing behaviour switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Skip malformed entries with a warning instead of stopping
    pub lenient: bool,
}

/// Line reader with a one-line replay slot.
///
/// Lines are yielded without their `\n` / `\r\n` terminator.
pub struct LineCursor<R> {
    lines: Lines<R>,
    pending: Option<String>,
}

impl<R: BufRead> LineCursor<R> {
    pub fn new(reader: R) -> Self {
        LineCursor {
            lines: reader.lines(),
            pending: None,
        }
    }

    /// Next line, or `None` at end of input
    pub fn next_line(&mut self) -> Result<Option<String>, SubtitleError> {
        if let Some(line) = self.pending.take() {
            return Ok(Some(line));
        }
        Ok(self.lines.next().transpose()?)
    }

    /// Put a line back so the next read returns it again
    pub fn push_back(&mut self, line: String) {
        debug_assert!(self.pending.is_none(), "only one line can be replayed");
        self.pending = Some(line);
    }

    /// Consume lines up to and including the next blank line
    pub fn skip_block(&mut self) -> Result<usize, SubtitleError> {
        let mut skipped = 0;
        while let Some(line) = self.next_line()? {
            if line.is_empty() {
                break;
            }
            skipped += 1;
        }
        Ok(skipped)
    }
}

/// Parse an SRT timestamp (`hh:mm:ss` with optional `,mmm`) to milliseconds
pub fn parse_timestamp(timestamp: &str) -> Result<i64, SubtitleError> {
    let malformed = || SubtitleError::MalformedTimestamp(timestamp.to_string());

    let (clock, millis) = match timestamp.split_once(',') {
        Some((_, millis)) if millis.contains(',') => return Err(malformed()),
        Some((clock, millis)) => (clock, parse_component(millis).ok_or_else(malformed)?),
        None => (timestamp, 0),
    };

    let parts: Vec<&str> = clock.split(':').collect();
    if parts.len() != 3 {
        return Err(malformed());
    }

    let hours = parse_component(parts[0]).ok_or_else(malformed)?;
    let minutes = parse_component(parts[1]).ok_or_else(malformed)?;
    let seconds = parse_component(parts[2]).ok_or_else(malformed)?;

    hours
        .checked_mul(3_600_000)
        .and_then(|total| total.checked_add(minutes.checked_mul(60_000)?))
        .and_then(|total| total.checked_add(seconds.checked_mul(1_000)?))
        .and_then(|total| total.checked_add(millis))
        .and_then(|total| i64::try_from(total).ok())
        .ok_or_else(malformed)
}

/// Format a timestamp in milliseconds to SRT format (HH:MM:SS,mmm)
pub fn format_timestamp(ms: i64) -> String {
    let ms = ms.max(0);
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}

// Digits only, no sign
fn parse_component(component: &str) -> Option<u64> {
    if component.is_empty() || !component.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    component.parse().ok()
}

fn parse_range(line: &str) -> Result<(i64, i64), SubtitleError> {
    let parts: Vec<&str> = line.split(RANGE_SEPARATOR).collect();
    if parts.len() != 2 {
        return Err(SubtitleError::InvalidRange(line.to_string()));
    }

    let start_ms = parse_timestamp(parts[0])?;
    let end_ms = parse_timestamp(parts[1])?;
    Ok((start_ms, end_ms))
}

/// Read one entry: index line, range line, then text up to a blank line.
///
/// Returns `Ok(None)` when the input ends cleanly before an index line.
pub fn read_entry<R: BufRead>(cursor: &mut LineCursor<R>) -> Result<Option<SubtitleEntry>, SubtitleError> {
    let Some(index_line) = cursor.next_line()? else {
        return Ok(None);
    };

    if !INDEX_REGEX.is_match(&index_line) {
        return Err(SubtitleError::InvalidIndex(index_line));
    }
    let index: u64 = match index_line.parse() {
        Ok(index) => index,
        Err(_) => return Err(SubtitleError::InvalidIndex(index_line)),
    };

    let range_line = cursor
        .next_line()?
        .ok_or(SubtitleError::TruncatedEntry { index })?;
    let (start_ms, end_ms) = parse_range(&range_line)?;

    let mut lines = Vec::new();
    while let Some(line) = cursor.next_line()? {
        if line.is_empty() {
            break;
        }
        lines.push(line);
    }

    if lines.is_empty() {
        return Err(SubtitleError::EmptyText { index });
    }

    Ok(Some(SubtitleEntry::new(index, start_ms, end_ms, lines.join("\n"))))
}

// Returns the directive value if the first line is one, otherwise replays the line
fn read_offset_directive<R: BufRead>(cursor: &mut LineCursor<R>) -> Result<Option<i64>, SubtitleError> {
    let Some(first_line) = cursor.next_line()? else {
        return Ok(None);
    };
    let first_line = first_line
        .strip_prefix(BYTE_ORDER_MARK)
        .map(str::to_string)
        .unwrap_or(first_line);

    let directive = OFFSET_DIRECTIVE_REGEX
        .captures(&first_line)
        .map(|caps| caps[1].parse::<i64>().ok());

    match directive {
        Some(Some(offset)) => {
            debug!("Found offset directive: {} ms", offset);
            Ok(Some(offset))
        }
        Some(None) => Err(SubtitleError::InvalidOffsetDirective(first_line)),
        None => {
            cursor.push_back(first_line);
            Ok(None)
        }
    }
}

// A blank index or range line already ended its block; anything else leaves the rest of the block unread
fn needs_resync(error: &SubtitleError) -> bool {
    match error {
        SubtitleError::InvalidIndex(line) => !line.is_empty(),
        SubtitleError::InvalidRange(line) => !line.is_empty(),
        SubtitleError::EmptyText { .. } => false,
        _ => true,
    }
}

/// Parse a whole SRT stream into a `SubtitleFile`.
///
/// A leading `OFFSET:<n>` line is taken as the offset directive and never seen by
/// the entry reader. On a hard error the entries read so far are returned inside
/// the `ParseFailure`.
pub fn parse_subtitles<R: BufRead>(reader: R, options: ParseOptions) -> Result<SubtitleFile, ParseFailure> {
    let mut cursor = LineCursor::new(reader);
    let mut entries = Vec::new();

    let offset_directive = match read_offset_directive(&mut cursor) {
        Ok(offset) => offset,
        Err(error) => return Err(ParseFailure { entries, error }),
    };

    let mut skipped = 0;
    loop {
        match read_entry(&mut cursor) {
            Ok(Some(entry)) => entries.push(entry),
            Ok(None) => break,
            Err(error) if options.lenient && error.is_recoverable() => {
                warn!("Skipping malformed subtitle entry: {}", error);
                skipped += 1;
                if needs_resync(&error) {
                    if let Err(error) = cursor.skip_block() {
                        return Err(ParseFailure { entries, error });
                    }
                }
            }
            Err(error) => return Err(ParseFailure { entries, error }),
        }
    }

    if skipped > 0 {
        info!("Parsed {} subtitle entries, skipped {} malformed", entries.len(), skipped);
    } else {
        debug!("Parsed {} subtitle entries", entries.len());
    }

    Ok(SubtitleFile::new(entries, offset_directive))
}

/// Parse SRT content held in memory
pub fn parse_srt_string(content: &str, options: ParseOptions) -> Result<SubtitleFile, ParseFailure> {
    parse_subtitles(content.as_bytes(), options)
}
