// SR history table widget: one row per date, newest first.
//
// Player column headers take the player's color; empty cells read "-".

use ratatui::layout::{Constraint, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{
    Block, Borders, Cell, Paragraph, Row, Scrollbar, ScrollbarOrientation, ScrollbarState, Table,
};
use ratatui::Frame;
use rankboard_core::config::EntityRegistry;
use rankboard_core::series::SrTable;

use crate::tui::widgets::{placeholder, to_color};
use crate::tui::{ViewState, SR_TABLE_SCROLL};

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let block = Block::default().borders(Borders::ALL).title("SR Table");

    let Some(table) = state
        .overview
        .as_ref()
        .map(|o| &o.table)
        .filter(|t| !t.headers.is_empty())
    else {
        let paragraph = Paragraph::new(placeholder(&state.overview_state))
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    };

    // Borders plus the header row.
    let visible_rows = (area.height as usize).saturating_sub(3);
    let total = table.rows.len();
    let max_offset = total.saturating_sub(visible_rows);
    let scroll_offset = state
        .scroll_offset
        .get(SR_TABLE_SCROLL)
        .copied()
        .unwrap_or(0)
        .min(max_offset);

    let header = header_row(table, &state.players);
    let rows: Vec<Row> = table
        .rows
        .iter()
        .skip(scroll_offset)
        .take(visible_rows.max(1))
        .map(|cells| Row::new(cells.iter().map(|c| Cell::from(c.as_str()))))
        .collect();

    let widths = column_widths(table);
    let widget = Table::new(rows, widths).header(header).block(block);
    frame.render_widget(widget, area);

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

/// Bold header row; player columns in the player's color.
fn header_row<'a>(table: &'a SrTable, players: &EntityRegistry) -> Row<'a> {
    let cells = table.headers.iter().enumerate().map(|(i, label)| {
        let color = if i == 0 {
            Color::White
        } else {
            to_color(players.color_for(label))
        };
        Cell::from(label.as_str()).style(Style::default().fg(color))
    });
    Row::new(cells).style(Style::default().add_modifier(Modifier::BOLD))
}

/// Each column as wide as its longest cell (min 3, plus one for spacing).
pub fn column_widths(table: &SrTable) -> Vec<Constraint> {
    (0..table.headers.len())
        .map(|col| {
            let widest = table
                .rows
                .iter()
                .filter_map(|row| row.get(col))
                .chain(table.headers.get(col))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0);
            Constraint::Length(widest.max(3) as u16 + 1)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
