/*!
 * Playback-time queries against parsed subtitle entries.
 */

use std::io::{self, Write};

use crate::errors::SubtitleError;
use crate::subtitle_processor::SubtitleEntry;

/// Slack applied on both sides of an entry's display interval
pub const DEFAULT_TOLERANCE_MS: i64 = 1000;

/// Parse a `mm:ss` playback time into milliseconds
pub fn parse_query(input: &str) -> Result<i64, SubtitleError> {
    let input = input.trim();
    let malformed = || SubtitleError::MalformedQuery(input.to_string());

    let parts: Vec<&str> = input.split(':').collect();
    if parts.len() != 2 {
        return Err(malformed());
    }

    let minutes = parse_part(parts[0]).ok_or_else(malformed)?;
    let seconds = parse_part(parts[1]).ok_or_else(malformed)?;

    Ok(i64::from(minutes) * 60_000 + i64::from(seconds) * 1_000)
}

fn parse_part(part: &str) -> Option<u32> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

/// Whether `entry`, shifted by `offset_ms` and widened by `tolerance_ms`, covers `query_ms`
pub fn is_showing_at(entry: &SubtitleEntry, query_ms: i64, offset_ms: i64, tolerance_ms: i64) -> bool {
    let end = entry.end_ms.saturating_add(offset_ms).saturating_add(tolerance_ms);
    let start = entry.start_ms.saturating_add(offset_ms).saturating_sub(tolerance_ms);
    end >= query_ms && start <= query_ms
}

/// All entries showing at `query_ms`, in file order
pub fn find_matches(
    entries: &[SubtitleEntry],
    query_ms: i64,
    offset_ms: i64,
    tolerance_ms: i64,
) -> Vec<&SubtitleEntry> {
    entries
        .iter()
        .filter(|entry| is_showing_at(entry, query_ms, offset_ms, tolerance_ms))
        .collect()
}

/// Write the text of every match, one block per entry, and return the match count
pub fn write_matches<W: Write>(
    output: &mut W,
    entries: &[SubtitleEntry],
    query_ms: i64,
    offset_ms: i64,
    tolerance_ms: i64,
) -> io::Result<usize> {
    let matches = find_matches(entries, query_ms, offset_ms, tolerance_ms);
    for entry in &matches {
        writeln!(output, "{}", entry.text)?;
    }
    Ok(matches.len())
}
