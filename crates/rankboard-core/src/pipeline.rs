// Grid -> view model pipelines.
//
// Each fetch runs exactly one of these over the fetched grid. They are pure:
// the same grid and registry always produce the same result, and nothing is
// carried over from earlier runs. A missing header yields `None`, which the
// caller renders as "no data" instead of a partial table.

use tracing::debug;

use crate::config::EntityRegistry;
use crate::series::{
    build_leaderboard, build_series, build_sr_table, select_data_rows, LeaderboardEntry,
    ScoreSeries, SrTable,
};
use crate::stats::{
    aggregate_rows, MatchColumns, PlayerReport, DATE_HEADER, DEATH_HEADER, ELIM_HEADER,
    MAP_HEADER, MODE_HEADER, RESULT_HEADERS,
};
use crate::table::{
    cell, extract_active_columns, locate_header_row, locate_header_row_with_all, resolve_any,
    RawRow,
};

/// Marker cell identifying the overview header row.
pub const OVERVIEW_MARKER: &str = "Date";

/// Cells that must all appear in a match sheet header row.
pub const MATCH_MARKERS: [&str; 3] = [MAP_HEADER, MODE_HEADER, ELIM_HEADER];

/// Everything the overview screen renders.
#[derive(Debug, Clone, PartialEq)]
pub struct Overview {
    /// X-axis labels, one per data row.
    pub labels: Vec<String>,
    pub series: Vec<ScoreSeries>,
    pub leaderboard: Vec<LeaderboardEntry>,
    pub table: SrTable,
}

/// Build the overview from the shared SR sheet.
pub fn build_overview(grid: &[RawRow], registry: &EntityRegistry) -> Option<Overview> {
    let Some(header_pos) = locate_header_row(grid, OVERVIEW_MARKER) else {
        debug!("overview sheet has no `{}` header", OVERVIEW_MARKER);
        return None;
    };
    let header = &grid[header_pos.row];
    let date_column = header_pos.column;

    // The date column is always the first active column.
    let columns = extract_active_columns(header, date_column);
    let players = &columns[1..];

    let data_rows = select_data_rows(&grid[header_pos.row + 1..], date_column);
    let labels = data_rows
        .iter()
        .map(|row| cell(row, date_column).trim().to_string())
        .collect();

    let series = build_series(&data_rows, players, registry);
    let leaderboard = build_leaderboard(&series);
    let table = build_sr_table(&data_rows, &columns);

    debug!(
        rows = data_rows.len(),
        players = series.len(),
        "overview built"
    );

    Some(Overview {
        labels,
        series,
        leaderboard,
        table,
    })
}

/// Resolve the match columns from a match sheet header row.
pub fn match_columns(header: &[String]) -> MatchColumns {
    MatchColumns {
        date: resolve_any(header, &[DATE_HEADER]),
        map: resolve_any(header, &[MAP_HEADER]),
        mode: resolve_any(header, &[MODE_HEADER]),
        elim: resolve_any(header, &[ELIM_HEADER]),
        death: resolve_any(header, &[DEATH_HEADER]),
        result: resolve_any(header, &RESULT_HEADERS),
    }
}

/// Build a player's stats and history from their match sheet.
pub fn build_player_report(grid: &[RawRow]) -> Option<PlayerReport> {
    let Some(header_row) = locate_header_row_with_all(grid, &MATCH_MARKERS) else {
        debug!("match sheet has no Map/Mode/Elim header");
        return None;
    };
    let columns = match_columns(&grid[header_row]);
    let report = aggregate_rows(&grid[header_row + 1..], &columns);

    debug!(
        games = report.stats.total_games,
        streak = report.stats.streak,
        "player report built"
    );
    Some(report)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
