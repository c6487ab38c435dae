//! Table extraction: find the first markdown table in a model reply and
//! parse it into strict 3-column rows.
//!
//! ## The matching contract
//!
//! A table is one contiguous block: a header line of at least three
//! pipe-delimited cells, immediately followed by a separator line of
//! dashes/pipes, immediately followed by one-or-more pipe-delimited data
//! lines. The scan is case-sensitive and returns the **first** match only —
//! if the model emitted several tables there is no policy for choosing
//! among them, the first wins.
//!
//! The matched substring is returned as-is: the canonical table text is
//! byte-identical to what the model wrote, which is also what the markdown
//! export emits.
//!
//! ## The parsing contract
//!
//! Parsing is strict: every data row must split into exactly 3 cells or the
//! whole parse fails with [`ExtractError::ColumnMismatch`]. A malformed row
//! is the model's error and the user should see it, not a silently padded
//! or truncated table.

use crate::error::ExtractError;
use crate::output::{StructuredTable, TableRow};
use once_cell::sync::Lazy;
use regex::Regex;

/// Header row, separator row, then one-or-more data rows, contiguous.
///
/// `.` does not match `\n`, so each component is line-scoped; the final
/// data row may end at end-of-input instead of a newline. The header must
/// carry at least 3 cells, but a data line only needs 2 — short rows are
/// deliberately captured into the block so the strict parser can reject
/// them as a column mismatch instead of the scan silently dropping them.
static RE_TABLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(\|.*\|.*\|.*\|\n)(\|[-| ]+\|[-| ]+\|[-| ]+\|\n)((?:\|.*\|.*\|(?:\n|$))+)",
    )
    .unwrap()
});

/// Find the first contiguous markdown table in `reply`.
///
/// Returns the exact matched substring (header + separator + data rows),
/// or `None` when the reply contains no recognisable table.
pub fn find_table(reply: &str) -> Option<&str> {
    RE_TABLE.find(reply).map(|m| m.as_str())
}

/// Parse canonical table text into a [`StructuredTable`].
///
/// The first two lines (header and separator) are discarded; every
/// remaining line containing a pipe is split into cells. Exactly 3 cells
/// per row or the parse fails.
pub fn parse_table(canonical: &str) -> Result<StructuredTable, ExtractError> {
    let mut rows = Vec::new();

    for line in canonical.lines().skip(2) {
        if !line.contains('|') {
            continue;
        }
        let cells = split_row(line);
        if cells.len() != 3 {
            return Err(ExtractError::ColumnMismatch {
                line: line.to_string(),
                cells: cells.len(),
            });
        }
        let mut cells = cells.into_iter();
        rows.push(TableRow {
            metric: cells.next().unwrap_or_default(),
            six_month: cells.next().unwrap_or_default(),
            three_month: cells.next().unwrap_or_default(),
        });
    }

    Ok(StructuredTable {
        canonical_text: canonical.to_string(),
        rows,
    })
}

/// Scan a model reply and parse the first table it contains.
///
/// `Err(NoTableFound)` carries the full reply so the caller can surface it
/// verbatim for manual inspection.
pub fn extract_table(reply: &str) -> Result<StructuredTable, ExtractError> {
    match find_table(reply) {
        Some(canonical) => parse_table(canonical),
        None => Err(ExtractError::NoTableFound {
            reply: reply.to_string(),
        }),
    }
}

/// Split a pipe-delimited row into trimmed cells.
///
/// Leading and trailing pipes produce empty edge fragments which are
/// discarded before trimming, so `| a | b | c |` yields 3 cells.
fn split_row(line: &str) -> Vec<String> {
    let parts: Vec<&str> = line.split('|').collect();
    if parts.len() < 3 {
        return Vec::new();
    }
    parts[1..parts.len() - 1]
        .iter()
        .map(|cell| cell.trim().to_string())
        .collect()
}

// ── Tests ────────────────────────────────────────────────────────────────────
