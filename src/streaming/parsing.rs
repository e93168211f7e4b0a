//! Zero-allocation line and token helpers.
//!
//! Identifier extraction runs once per data row on both inputs, so these
//! helpers work on borrowed slices and never split the whole line.

use memchr::memchr;
use std::ops::Range;

/// Marker prefix for dosage metadata lines.
pub const METADATA_MARKER: &[u8] = b"##";

/// Column holding the variant identifier in dosage rows.
pub const DOSAGE_ID_COLUMN: usize = 2;

/// Column holding the variant identifier in info rows.
pub const INFO_ID_COLUMN: usize = 0;

/// Byte range of the tab-delimited field at `index` (zero-based).
///
/// Returns None if the line has fewer than `index + 1` fields.
/// Only the fields up to `index` are scanned.
#[inline(always)]
pub fn tab_field_range(line: &[u8], index: usize) -> Option<Range<usize>> {
    let mut start = 0;
    for _ in 0..index {
        let tab = memchr(b'\t', &line[start..])?;
        start += tab + 1;
    }
    let end = memchr(b'\t', &line[start..]).map_or(line.len(), |t| start + t);
    Some(start..end)
}

/// Return the tab-delimited field at `index` (zero-based).
#[inline(always)]
pub fn tab_field(line: &str, index: usize) -> Option<&str> {
    tab_field_range(line.as_bytes(), index).map(|r| &line[r])
}

/// Check whether a dosage line is a metadata line.
#[inline(always)]
pub fn is_metadata_line(line: &[u8]) -> bool {
    line.starts_with(METADATA_MARKER)
}

/// First whitespace-delimited token of a line, if any.
///
/// Only ASCII whitespace separates tokens; other bytes are taken as-is.
#[inline]
pub fn first_token(line: &[u8]) -> Option<&[u8]> {
    line.split(|b| b.is_ascii_whitespace())
        .find(|token| !token.is_empty())
}

/// Strip a trailing `\n` left by `read_until`.
#[inline(always)]
pub fn trim_newline(line: &mut Vec<u8>) {
    if line.last() == Some(&b'\n') {
        line.pop();
    }
}
