// Status bar widget: tab indicator, current view, load state, refresh time.

use chrono::{DateTime, Local};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::protocol::{LoadState, TabId};
use crate::tui::ViewState;

/// Render the status bar into the given area.
///
/// Layout: [tab bar] | [view title] | [load state (error)] | [last refresh]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = tab_spans(state.active_tab);

    spans.push(Span::styled("| ", Style::default().fg(Color::Gray)));
    spans.push(Span::styled(
        view_title(state),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    ));

    spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
    let (label, color) = load_indicator(state.load_state());
    spans.push(Span::styled(label, Style::default().fg(color)));
    if let Some(detail) = failure_detail(state.load_state()) {
        spans.push(Span::styled(detail, Style::default().fg(Color::DarkGray)));
    }

    spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
    spans.push(Span::styled(
        refresh_label(state.last_refresh.as_ref()),
        Style::default().fg(Color::Gray),
    ));

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// Build tab indicator spans with the active tab highlighted.
pub fn tab_spans(active: TabId) -> Vec<Span<'static>> {
    let tabs = [(TabId::Overview, "1:Overview"), (TabId::Player, "2:Player")];

    let mut spans = vec![Span::raw(" ")];
    for (tab_id, label) in tabs {
        let style = if tab_id == active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::styled(format!("[{}]", label), style));
        spans.push(Span::raw(" "));
    }
    spans
}

pub fn view_title(state: &ViewState) -> String {
    match state.active_tab {
        TabId::Overview => "Squad Overview".to_string(),
        TabId::Player => state
            .player_name
            .clone()
            .unwrap_or_else(|| "No player".to_string()),
    }
}

pub fn load_indicator(load: &LoadState) -> (&'static str, Color) {
    match load {
        LoadState::Idle => ("Idle", Color::Gray),
        LoadState::Loading => ("Loading...", Color::Yellow),
        LoadState::Loaded => ("Ready", Color::Green),
        LoadState::NoData => ("No data", Color::Gray),
        LoadState::NotFound => ("Player Not Found", Color::Red),
        LoadState::Failed(_) => ("Error Loading Data", Color::Red),
    }
}

/// Dimmed suffix carrying the fetch error, if the active view failed.
pub fn failure_detail(load: &LoadState) -> Option<String> {
    match load {
        LoadState::Failed(message) if !message.is_empty() => Some(format!(" ({})", message)),
        _ => None,
    }
}

pub fn refresh_label(last: Option<&DateTime<Local>>) -> String {
    match last {
        Some(time) => format!("Updated {}", time.format("%H:%M:%S")),
        None => "Not loaded".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::widgets::render_to_text;
    use chrono::TimeZone;

    #[test]
    fn tab_spans_highlight_active() {
        let spans = tab_spans(TabId::Player);
        // 0=" ", 1=[1:Overview], 2=" ", 3=[2:Player]
        assert!(!spans[1].style.add_modifier.contains(Modifier::BOLD));
        assert!(spans[3].style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(spans[3].content, "[2:Player]");
    }

    #[test]
    fn load_indicator_values() {
        assert_eq!(load_indicator(&LoadState::Loaded), ("Ready", Color::Green));
        assert_eq!(
            load_indicator(&LoadState::Failed("timeout".into())).0,
            "Error Loading Data"
        );
        assert_eq!(load_indicator(&LoadState::NotFound).1, Color::Red);
    }

    #[test]
    fn refresh_label_formats_time() {
        let time = Local.with_ymd_and_hms(2024, 3, 1, 9, 5, 7).unwrap();
        assert_eq!(refresh_label(Some(&time)), "Updated 09:05:07");
        assert_eq!(refresh_label(None), "Not loaded");
    }

    #[test]
    fn view_title_uses_player_name() {
        let mut state = ViewState::default();
        assert_eq!(view_title(&state), "Squad Overview");
        state.active_tab = TabId::Player;
        assert_eq!(view_title(&state), "No player");
        state.player_name = Some("Ant".into());
        assert_eq!(view_title(&state), "Ant");
    }

    #[test]
    fn render_shows_load_state() {
        let mut state = ViewState::default();
        state.overview_state = LoadState::Failed("boom".into());
        let text = render_to_text(100, 1, |frame| render(frame, frame.area(), &state));
        assert!(text.contains("[1:Overview]"));
        assert!(text.contains("Error Loading Data (boom)"));
        assert!(text.contains("Not loaded"));
    }

    #[test]
    fn failure_detail_only_for_failed_views() {
        assert_eq!(
            failure_detail(&LoadState::Failed("request timed out".into())),
            Some(" (request timed out)".to_string())
        );
        assert_eq!(failure_detail(&LoadState::Failed(String::new())), None);
        assert_eq!(failure_detail(&LoadState::Loading), None);
    }
}
