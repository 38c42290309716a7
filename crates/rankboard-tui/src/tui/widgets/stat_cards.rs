// Stat cards widget: KD, Win Rate, Games and Streak for the loaded player.

use std::time::Instant;

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use rankboard_core::stats::AggregateStats;

use crate::tui::layout::split_cards;
use crate::tui::widgets::{placeholder, to_color, BAD, GOOD};
use crate::tui::ViewState;

/// One card: title, value text and value color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    pub title: &'static str,
    pub value: String,
    pub color: Color,
}

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let accent = state
        .player_name
        .as_deref()
        .map_or(Color::White, |name| to_color(state.players.color_for(name)));

    let Some(report) = &state.report else {
        let title = state.player_name.clone().unwrap_or_default();
        let paragraph = Paragraph::new(placeholder(&state.player_state))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(accent))
                    .title(title),
            );
        frame.render_widget(paragraph, area);
        return;
    };

    let cards = build_cards(&report.stats, state.kd_text(Instant::now()));
    for (card, rect) in cards.iter().zip(split_cards(area, cards.len())) {
        let paragraph = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                card.value.clone(),
                Style::default()
                    .fg(card.color)
                    .add_modifier(Modifier::BOLD),
            )),
        ])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(accent))
                .title(card.title),
        );
        frame.render_widget(paragraph, rect);
    }
}

/// Cards in display order. `kd_text` is passed in so the KD card can show
/// the count-up value.
pub fn build_cards(stats: &AggregateStats, kd_text: String) -> Vec<StatCard> {
    vec![
        StatCard {
            title: "K/D",
            value: kd_text,
            color: Color::White,
        },
        StatCard {
            title: "Win Rate",
            value: stats.win_rate(),
            color: Color::White,
        },
        StatCard {
            title: "Games",
            value: stats.total_games.to_string(),
            color: Color::White,
        },
        StatCard {
            title: "Streak",
            value: stats.streak_label(),
            color: streak_color(stats.streak),
        },
    ]
}

/// Green for a win streak; red otherwise, including the empty `0 L` streak.
pub fn streak_color(streak: i32) -> Color {
    if streak > 0 {
        GOOD
    } else {
        BAD
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
