// Table normalization for loosely structured spreadsheet exports.
//
// Published sheets carry title rows, notes and blank padding around the real
// table, so nothing here assumes a fixed schema. The header row is found by
// content, columns are resolved by header text, and incomplete rows are
// filtered out before any statistics are derived.

use std::collections::HashMap;
use std::ops::RangeBounds;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// One spreadsheet row. Rows may differ in length.
pub type RawRow = Vec<String>;

/// A full sheet as fetched from the data source.
pub type Grid = Vec<RawRow>;

/// Location of the marker cell that identified the header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderPosition {
    pub row: usize,
    pub column: usize,
}

/// A non-empty header cell together with the column it actually sits in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledColumn {
    pub column: usize,
    pub label: String,
}

// ---------------------------------------------------------------------------
// Cell access
// ---------------------------------------------------------------------------

/// Read a cell, treating anything past the end of the row as empty.
pub fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map(String::as_str).unwrap_or("")
}

/// Read an optional column. A column that was never resolved reads as empty.
pub fn cell_at(row: &[String], index: Option<usize>) -> &str {
    index.map_or("", |i| cell(row, i))
}

fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

// ---------------------------------------------------------------------------
// Header detection
// ---------------------------------------------------------------------------

/// Find the first row holding a cell equal (after trimming) to `marker`.
///
/// Returns `None` when no row in the grid has the marker; callers treat that
/// as "no data" rather than an error.
pub fn locate_header_row(rows: &[RawRow], marker: &str) -> Option<HeaderPosition> {
    rows.iter().enumerate().find_map(|(row, cells)| {
        cells
            .iter()
            .position(|c| c.trim() == marker)
            .map(|column| HeaderPosition { row, column })
    })
}

/// Find the first row that contains every one of `markers` as a trimmed cell.
pub fn locate_header_row_with_all(rows: &[RawRow], markers: &[&str]) -> Option<usize> {
    rows.iter().position(|cells| {
        markers
            .iter()
            .all(|marker| cells.iter().any(|c| c.trim() == *marker))
    })
}

/// Resolve each requested name to the index of its first matching header
/// cell. Missing names map to `None`; the lookup itself never fails.
pub fn resolve_columns(header: &[String], names: &[&str]) -> HashMap<String, Option<usize>> {
    names
        .iter()
        .map(|name| (name.to_string(), resolve_any(header, &[*name])))
        .collect()
}

/// Index of the first header cell matching any of the alternative names.
pub fn resolve_any(header: &[String], alternatives: &[&str]) -> Option<usize> {
    header
        .iter()
        .position(|c| alternatives.contains(&c.trim()))
}

// ---------------------------------------------------------------------------
// Row filtering and labels
// ---------------------------------------------------------------------------

/// Keep rows that have a key cell and at least one value inside
/// `value_columns`. Source order is preserved.
pub fn filter_data_rows<R>(rows: &[RawRow], key_column: usize, value_columns: R) -> Vec<RawRow>
where
    R: RangeBounds<usize>,
{
    rows.iter()
        .filter(|row| {
            let has_key = !is_blank(cell(row, key_column));
            let has_value = row
                .iter()
                .enumerate()
                .any(|(i, c)| value_columns.contains(&i) && !is_blank(c));
            has_key && has_value
        })
        .cloned()
        .collect()
}

/// Non-empty header cells from `from` onward, with their real column index.
pub fn extract_active_columns(header: &[String], from: usize) -> Vec<LabeledColumn> {
    header
        .iter()
        .enumerate()
        .skip(from)
        .filter(|(_, c)| !is_blank(c))
        .map(|(column, c)| LabeledColumn {
            column,
            label: c.trim().to_string(),
        })
        .collect()
}

/// Non-empty header cells from `from` onward, in order.
pub fn extract_active_labels(header: &[String], from: usize) -> Vec<String> {
    extract_active_columns(header, from)
        .into_iter()
        .map(|c| c.label)
        .collect()
}

// ---------------------------------------------------------------------------
// Numeric parsing
// ---------------------------------------------------------------------------

/// Parse the leading integer of `text`: optional sign then digits, with any
/// trailing text ignored. Returns `None` when no digits lead the text.
fn parse_leading_int(text: &str) -> Option<i64> {
    let text = text.trim();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Parse a score cell such as `"2,450"`. Thousands separators are stripped
/// first. Empty or unparseable cells yield `None`, never zero, so a missing
/// data point stays distinguishable from a real zero.
pub fn parse_score(text: &str) -> Option<i64> {
    let stripped: String = text.chars().filter(|c| *c != ',').collect();
    parse_leading_int(&stripped)
}

/// Parse a counter cell (eliminations, deaths). Counters feed sums, so an
/// empty, malformed or negative cell counts as zero. A negative tally is
/// treated as a typo rather than subtracted from the totals.
pub fn parse_count(text: &str) -> u32 {
    parse_leading_int(text)
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
