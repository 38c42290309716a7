// SR series, leaderboard and history table for the shared overview sheet.
//
// The overview sheet holds one row per date and one column per player. The
// header row is the row containing a `Date` cell; every non-empty header cell
// to its right names a player.

use crate::config::{EntityRegistry, Rgb};
use crate::rank::classify_sr;
use crate::table::{cell, filter_data_rows, parse_score, LabeledColumn, RawRow};

/// Placeholder shown in the history table for empty cells.
pub const EMPTY_CELL: &str = "-";

/// One player's SR over time.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreSeries {
    pub name: String,
    pub column: usize,
    /// One point per data row; `None` where the player has no entry.
    pub points: Vec<Option<i64>>,
    /// Most recent recorded SR.
    pub latest: Option<i64>,
    pub rank: &'static str,
    pub color: Rgb,
}

/// A leaderboard card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub name: String,
    /// Latest SR, or 0 for a player with no entries.
    pub sr: i64,
    pub rank: &'static str,
    pub color: Rgb,
}

/// SR history table: the active header labels and rows, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SrTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Build one series per player column.
pub fn build_series(
    data_rows: &[RawRow],
    players: &[LabeledColumn],
    registry: &EntityRegistry,
) -> Vec<ScoreSeries> {
    players
        .iter()
        .map(|player| {
            let points: Vec<Option<i64>> = data_rows
                .iter()
                .map(|row| parse_score(cell(row, player.column)))
                .collect();
            let latest = points.iter().rev().find_map(|p| *p);
            ScoreSeries {
                name: player.label.clone(),
                column: player.column,
                latest,
                rank: classify_sr(latest),
                color: registry.color_for(&player.label),
                points,
            }
        })
        .collect()
}

/// Leaderboard sorted by SR, highest first. Ties keep sheet column order.
pub fn build_leaderboard(series: &[ScoreSeries]) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = series
        .iter()
        .map(|s| LeaderboardEntry {
            name: s.name.clone(),
            sr: s.latest.unwrap_or(0),
            rank: s.rank,
            color: s.color,
        })
        .collect();
    entries.sort_by(|a, b| b.sr.cmp(&a.sr));
    entries
}

/// History table over all active columns (date first), newest row first.
pub fn build_sr_table(data_rows: &[RawRow], columns: &[LabeledColumn]) -> SrTable {
    let headers = columns.iter().map(|c| c.label.clone()).collect();
    let rows = data_rows
        .iter()
        .rev()
        .map(|row| {
            columns
                .iter()
                .map(|c| {
                    let text = cell(row, c.column).trim();
                    if text.is_empty() {
                        EMPTY_CELL.to_string()
                    } else {
                        text.to_string()
                    }
                })
                .collect()
        })
        .collect();
    SrTable { headers, rows }
}

/// Rows after the header that carry a date and at least one value to the
/// right of it.
pub fn select_data_rows(rows_after_header: &[RawRow], date_column: usize) -> Vec<RawRow> {
    filter_data_rows(rows_after_header, date_column, date_column + 1..)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
