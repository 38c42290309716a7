// Screen layout: panel arrangement and sizing.
//
// Overview tab:
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +--------------------------------------------------+
// | Leaderboard cards (5 rows)                        |
// +-------------------------+------------------------+
// | SR Chart (60%)           | SR History (40%)       |
// +-------------------------+------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+
//
// Player tab:
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +--------------------------------------------------+
// | Stat cards (5 rows)                               |
// +--------------------------------------------------+
// | Match History (fill)                              |
// +--------------------------------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Height of the card strip on both tabs (3 text rows plus borders).
pub const CARD_HEIGHT: u16 = 5;

/// Areas shared by both tabs.
#[derive(Debug, Clone)]
pub struct AppLayout {
    pub status_bar: Rect,
    /// Card strip: leaderboard on the overview tab, stat cards on the player tab.
    pub cards: Rect,
    /// Everything between the cards and the help bar.
    pub body: Rect,
    pub help_bar: Rect,
}

/// Split of the overview body.
#[derive(Debug, Clone)]
pub struct OverviewBody {
    pub chart: Rect,
    pub table: Rect,
}

pub fn build_layout(area: Rect) -> AppLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),           // status bar
            Constraint::Length(CARD_HEIGHT), // cards
            Constraint::Min(6),              // body
            Constraint::Length(1),           // help bar
        ])
        .split(area);

    AppLayout {
        status_bar: vertical[0],
        cards: vertical[1],
        body: vertical[2],
        help_bar: vertical[3],
    }
}

pub fn split_overview_body(body: Rect) -> OverviewBody {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(body);

    OverviewBody {
        chart: horizontal[0],
        table: horizontal[1],
    }
}

/// Split a strip into `count` equal-width cards.
pub fn split_cards(area: Rect, count: usize) -> Vec<Rect> {
    if count == 0 {
        return Vec::new();
    }
    let constraints = vec![Constraint::Ratio(1, count as u32); count];
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area)
        .to_vec()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn test_area() -> Rect {
        Rect::new(0, 0, 160, 50)
    }

    #[test]
    fn layout_all_rects_nonzero() {
        let layout = build_layout(test_area());
        let rects = [
            ("status_bar", layout.status_bar),
            ("cards", layout.cards),
            ("body", layout.body),
            ("help_bar", layout.help_bar),
        ];
        for (name, rect) in &rects {
            assert!(
                rect.width > 0 && rect.height > 0,
                "{} has zero area: {:?}",
                name,
                rect
            );
        }
    }

    #[test]
    fn layout_fixed_heights() {
        let layout = build_layout(test_area());
        assert_eq!(layout.status_bar.height, 1);
        assert_eq!(layout.cards.height, CARD_HEIGHT);
        assert_eq!(layout.help_bar.height, 1);
        assert_eq!(layout.body.height, 50 - 1 - CARD_HEIGHT - 1);
    }

    #[test]
    fn overview_chart_wider_than_table() {
        let body = split_overview_body(build_layout(test_area()).body);
        assert!(body.chart.width > body.table.width);
        assert_eq!(body.chart.y, body.table.y);
    }

    #[test]
    fn cards_cover_the_strip() {
        let strip = Rect::new(0, 1, 100, CARD_HEIGHT);
        let cards = split_cards(strip, 4);
        assert_eq!(cards.len(), 4);
        assert_eq!(cards.iter().map(|c| c.width).sum::<u16>(), 100);
        assert!(split_cards(strip, 0).is_empty());
    }

    #[test]
    fn layout_small_terminal_still_valid() {
        let layout = build_layout(Rect::new(0, 0, 40, 14));
        for rect in [layout.status_bar, layout.cards, layout.body, layout.help_bar] {
            assert!(rect.width > 0 && rect.height > 0, "{:?}", rect);
        }
    }
}
