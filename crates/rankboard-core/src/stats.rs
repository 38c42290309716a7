// Per-player match statistics: totals, kill/death ratio, win rate and streak.
//
// Accumulation runs in sheet order (oldest first) so the streak reflects the
// most recent results; the history handed to the view is newest first.

use std::fmt;

use crate::table::{cell_at, parse_count, RawRow};

// ---------------------------------------------------------------------------
// Match columns
// ---------------------------------------------------------------------------

/// Header names recognized in a match sheet.
pub const DATE_HEADER: &str = "Date";
pub const MAP_HEADER: &str = "Map";
pub const MODE_HEADER: &str = "Mode";
pub const ELIM_HEADER: &str = "Elim";
pub const DEATH_HEADER: &str = "Death";
pub const RESULT_HEADERS: [&str; 2] = ["W/L", "Result"];

/// Column indices resolved from a match sheet header. Any of them may be
/// missing; a missing column reads as an empty cell in every row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchColumns {
    pub date: Option<usize>,
    pub map: Option<usize>,
    pub mode: Option<usize>,
    pub elim: Option<usize>,
    pub death: Option<usize>,
    pub result: Option<usize>,
}

// ---------------------------------------------------------------------------
// Match result / kd
// ---------------------------------------------------------------------------

/// Outcome marker of a single match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    Win,
    Loss,
    /// Anything other than `W`/`L`, kept as the normalized text (`-` when the
    /// cell was empty). Neutral for streak and win count.
    Other(String),
}

impl MatchResult {
    /// Trim and uppercase the cell; only `W` and `L` carry meaning.
    pub fn parse(text: &str) -> Self {
        let normalized = text.trim().to_uppercase();
        match normalized.as_str() {
            "W" => MatchResult::Win,
            "L" => MatchResult::Loss,
            "" => MatchResult::Other("-".to_string()),
            _ => MatchResult::Other(normalized),
        }
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchResult::Win => f.write_str("W"),
            MatchResult::Loss => f.write_str("L"),
            MatchResult::Other(text) => f.write_str(text),
        }
    }
}

/// Kill/death figure shown for one match.
///
/// A deathless match shows the raw elimination count instead of a ratio, so a
/// flawless game never reads as "0.00".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKd {
    Ratio { eliminations: u32, deaths: u32 },
    Eliminations(u32),
}

impl MatchKd {
    pub fn from_counts(eliminations: u32, deaths: u32) -> Self {
        if deaths > 0 {
            MatchKd::Ratio {
                eliminations,
                deaths,
            }
        } else {
            MatchKd::Eliminations(eliminations)
        }
    }

    /// Numeric value as displayed (ratios rounded to two decimals).
    pub fn value(&self) -> f64 {
        match *self {
            MatchKd::Ratio {
                eliminations,
                deaths,
            } => scaled_half_up(eliminations as u64, deaths as u64, 100) as f64 / 100.0,
            MatchKd::Eliminations(e) => e as f64,
        }
    }
}

impl fmt::Display for MatchKd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            MatchKd::Ratio {
                eliminations,
                deaths,
            } => f.write_str(&fixed_ratio(eliminations as u64, deaths as u64, 2)),
            MatchKd::Eliminations(e) => write!(f, "{}", e),
        }
    }
}

// ---------------------------------------------------------------------------
// Fixed-point formatting
// ---------------------------------------------------------------------------

/// `numer / denom * scale`, rounded to the nearest integer with ties going up.
/// `denom` must be non-zero.
fn scaled_half_up(numer: u64, denom: u64, scale: u64) -> u128 {
    let (n, d, k) = (numer as u128, denom as u128, scale as u128);
    (2 * k * n + d) / (2 * d)
}

/// `numer / denom` as text with `decimals` places, ties rounded up
/// (`1/8` is `"0.13"`). `denom` must be non-zero.
pub fn fixed_ratio(numer: u64, denom: u64, decimals: u32) -> String {
    let scale = 10u64.pow(decimals);
    let scaled = scaled_half_up(numer, denom, scale);
    if decimals == 0 {
        return scaled.to_string();
    }
    let scale = scale as u128;
    format!(
        "{}.{:0width$}",
        scaled / scale,
        scaled % scale,
        width = decimals as usize
    )
}

// ---------------------------------------------------------------------------
// Rows and records
// ---------------------------------------------------------------------------

/// A parsed match row, ready for accumulation.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRow {
    pub date: String,
    pub map: String,
    pub mode: String,
    pub eliminations: u32,
    pub deaths: u32,
    pub result: MatchResult,
}

impl MatchRow {
    /// Build a match from a sheet row. Rows without both a map and a mode are
    /// placeholders (unplayed slots, notes) and yield `None`.
    pub fn from_raw(row: &[String], columns: &MatchColumns) -> Option<Self> {
        let map = cell_at(row, columns.map).trim();
        let mode = cell_at(row, columns.mode).trim();
        if map.is_empty() || mode.is_empty() {
            return None;
        }
        Some(MatchRow {
            date: cell_at(row, columns.date).trim().to_string(),
            map: map.to_string(),
            mode: mode.to_string(),
            eliminations: parse_count(cell_at(row, columns.elim)),
            deaths: parse_count(cell_at(row, columns.death)),
            result: MatchResult::parse(cell_at(row, columns.result)),
        })
    }
}

/// One entry of the rendered match history.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRecord {
    pub date: String,
    pub map: String,
    pub mode: String,
    pub kd: MatchKd,
    pub result: MatchResult,
}

// ---------------------------------------------------------------------------
// AggregateStats
// ---------------------------------------------------------------------------

/// Running totals for one player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateStats {
    pub total_eliminations: u64,
    pub total_deaths: u64,
    pub total_games: u32,
    pub wins: u32,
    /// Positive: consecutive wins. Negative: consecutive losses.
    pub streak: i32,
}

impl AggregateStats {
    /// Fold one match into the totals.
    pub fn record(&mut self, eliminations: u32, deaths: u32, result: &MatchResult) {
        self.total_eliminations = self.total_eliminations.saturating_add(eliminations as u64);
        self.total_deaths = self.total_deaths.saturating_add(deaths as u64);
        self.total_games += 1;

        match result {
            MatchResult::Win => {
                self.wins += 1;
                self.streak = if self.streak >= 0 { self.streak + 1 } else { 1 };
            }
            MatchResult::Loss => {
                self.streak = if self.streak <= 0 { self.streak - 1 } else { -1 };
            }
            MatchResult::Other(_) => {}
        }
    }

    /// Overall kill/death ratio, `"0.00"` when there are no deaths.
    pub fn kd(&self) -> String {
        if self.total_deaths > 0 {
            fixed_ratio(self.total_eliminations, self.total_deaths, 2)
        } else {
            "0.00".to_string()
        }
    }

    /// Numeric form of [`kd`](Self::kd), used as the count-up target.
    pub fn kd_value(&self) -> f64 {
        if self.total_deaths > 0 {
            scaled_half_up(self.total_eliminations, self.total_deaths, 100) as f64 / 100.0
        } else {
            0.0
        }
    }

    /// Win percentage with one decimal, `"0%"` when no games were played.
    pub fn win_rate(&self) -> String {
        if self.total_games > 0 {
            format!(
                "{}%",
                fixed_ratio(self.wins as u64 * 100, self.total_games as u64, 1)
            )
        } else {
            "0%".to_string()
        }
    }

    /// Streak label: `+3 W` for wins, `-2 L` for losses. An empty streak
    /// renders as `0 L`.
    pub fn streak_label(&self) -> String {
        if self.streak > 0 {
            format!("+{} W", self.streak)
        } else {
            format!("{} L", self.streak)
        }
    }
}

/// Stats plus match history for the player view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerReport {
    pub stats: AggregateStats,
    /// Newest match first.
    pub history: Vec<MatchRecord>,
}

/// Accumulate matches given oldest first.
pub fn aggregate<I>(matches: I) -> PlayerReport
where
    I: IntoIterator<Item = MatchRow>,
{
    let mut stats = AggregateStats::default();
    let mut history = Vec::new();

    for m in matches {
        stats.record(m.eliminations, m.deaths, &m.result);
        history.push(MatchRecord {
            kd: MatchKd::from_counts(m.eliminations, m.deaths),
            date: m.date,
            map: m.map,
            mode: m.mode,
            result: m.result,
        });
    }

    history.reverse();
    PlayerReport { stats, history }
}

/// Parse and accumulate raw data rows, skipping placeholder rows.
pub fn aggregate_rows(rows: &[RawRow], columns: &MatchColumns) -> PlayerReport {
    aggregate(rows.iter().filter_map(|row| MatchRow::from_raw(row, columns)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
