// Match history widget: the loaded player's matches, newest first.
//
// Columns: Date, Map, Mode, K/D, Result
// K/D is green at 1.0 or above, red below. Result: W green, L red.

use ratatui::layout::{Constraint, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{
    Block, Borders, Cell, Paragraph, Row, Scrollbar, ScrollbarOrientation, ScrollbarState, Table,
};
use ratatui::Frame;
use rankboard_core::stats::{MatchKd, MatchRecord, MatchResult};

use crate::tui::widgets::{placeholder, BAD, GOOD};
use crate::tui::{ViewState, MATCH_HISTORY_SCROLL};

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let history = state
        .report
        .as_ref()
        .map(|r| r.history.as_slice())
        .unwrap_or_default();

    if history.is_empty() {
        let paragraph = Paragraph::new(format!("  {}", empty_message(state)))
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title("Match History"));
        frame.render_widget(paragraph, area);
        return;
    }

    // Borders plus the header row.
    let visible_rows = (area.height as usize).saturating_sub(3);
    let total = history.len();
    let max_offset = total.saturating_sub(visible_rows);
    let scroll_offset = state
        .scroll_offset
        .get(MATCH_HISTORY_SCROLL)
        .copied()
        .unwrap_or(0)
        .min(max_offset);

    let header = Row::new(vec![
        Cell::from("Date"),
        Cell::from("Map"),
        Cell::from("Mode"),
        Cell::from("K/D"),
        Cell::from("Result"),
    ])
    .style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = history
        .iter()
        .skip(scroll_offset)
        .take(visible_rows.max(1))
        .map(match_row)
        .collect();

    let widths = [
        Constraint::Length(10),
        Constraint::Min(14),
        Constraint::Length(12),
        Constraint::Length(6),
        Constraint::Length(6),
    ];

    let title = format!("Match History ({})", total);
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(table, area);

    if total > visible_rows {
        let mut scrollbar_state =
            ScrollbarState::new(total.saturating_sub(visible_rows)).position(scroll_offset);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            area.inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut scrollbar_state,
        );
    }
}

fn empty_message(state: &ViewState) -> &'static str {
    if state.report.is_some() {
        "No matches recorded."
    } else {
        placeholder(&state.player_state)
    }
}

fn match_row(record: &MatchRecord) -> Row<'static> {
    let bold = Modifier::BOLD;
    Row::new(vec![
        Cell::from(record.date.clone()),
        Cell::from(record.map.clone()),
        Cell::from(record.mode.clone()),
        Cell::from(record.kd.to_string())
            .style(Style::default().fg(kd_color(&record.kd)).add_modifier(bold)),
        Cell::from(record.result.to_string())
            .style(Style::default().fg(result_color(&record.result)).add_modifier(bold)),
    ])
}

/// Green at a displayed K/D of 1.0 or more, red below.
pub fn kd_color(kd: &MatchKd) -> Color {
    if kd.value() >= 1.0 {
        GOOD
    } else {
        BAD
    }
}

pub fn result_color(result: &MatchResult) -> Color {
    match result {
        MatchResult::Win => GOOD,
        MatchResult::Loss => BAD,
        MatchResult::Other(_) => Color::White,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
