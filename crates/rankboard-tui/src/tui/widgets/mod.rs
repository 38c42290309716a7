// TUI widget modules for each dashboard panel, plus shared helpers.

pub mod leaderboard;
pub mod match_history;
pub mod sr_chart;
pub mod sr_table;
pub mod stat_cards;
pub mod status_bar;

use ratatui::style::Color;
use rankboard_core::config::Rgb;

use crate::protocol::LoadState;

/// Win/positive green and loss/negative red used across panels.
pub const GOOD: Color = Color::Rgb(0x4C, 0xAF, 0x50);
pub const BAD: Color = Color::Rgb(0xFF, 0x52, 0x52);

pub fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

/// Text shown in a panel that has nothing to draw.
pub fn placeholder(load: &LoadState) -> &'static str {
    match load {
        LoadState::Idle | LoadState::Loading => "Loading...",
        LoadState::Loaded | LoadState::NoData => "No data",
        LoadState::NotFound => "Player Not Found",
        LoadState::Failed(_) => "Error Loading Data",
    }
}

/// Render `draw` into a test terminal and return the buffer as text.
#[cfg(test)]
pub(crate) fn render_to_text<F>(width: u16, height: u16, draw: F) -> String
where
    F: FnOnce(&mut ratatui::Frame),
{
    let backend = ratatui::backend::TestBackend::new(width, height);
    let mut terminal = ratatui::Terminal::new(backend).unwrap();
    terminal.draw(draw).unwrap();
    terminal
        .backend()
        .buffer()
        .content
        .iter()
        .map(|cell| cell.symbol())
        .collect()
}
