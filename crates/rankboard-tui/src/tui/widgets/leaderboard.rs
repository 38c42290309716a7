// Leaderboard widget: one card per player, highest SR first.
//
// Card: border in the player's color, then name / SR / rank tier.

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use rankboard_core::series::LeaderboardEntry;

use crate::tui::layout::split_cards;
use crate::tui::widgets::{placeholder, to_color};
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let entries = state
        .overview
        .as_ref()
        .map(|o| o.leaderboard.as_slice())
        .unwrap_or_default();

    if entries.is_empty() {
        let paragraph = Paragraph::new(placeholder(&state.overview_state))
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title("Leaderboard"));
        frame.render_widget(paragraph, area);
        return;
    }

    for (entry, card) in entries.iter().zip(split_cards(area, entries.len())) {
        let color = to_color(entry.color);
        let paragraph = Paragraph::new(card_lines(entry))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            );
        frame.render_widget(paragraph, card);
    }
}

/// Name, SR and rank lines for one card.
pub fn card_lines(entry: &LeaderboardEntry) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(
            entry.name.clone(),
            Style::default()
                .fg(to_color(entry.color))
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            entry.sr.to_string(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(entry.rank, Style::default().fg(Color::Gray))),
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
