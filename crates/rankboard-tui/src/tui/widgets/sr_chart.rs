// SR chart widget: one line per player over the overview dates.
//
// A date where a player has no entry breaks that player's line instead of
// bridging it, so each series is drawn as one dataset per contiguous run.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph};
use ratatui::Frame;
use rankboard_core::series::ScoreSeries;

use crate::tui::widgets::{placeholder, to_color};
use crate::tui::ViewState;

/// Y range used when no player has a single point.
const DEFAULT_Y_BOUNDS: [f64; 2] = [0.0, 5000.0];

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let block = Block::default().borders(Borders::ALL).title("SR History");

    let Some(overview) = state.overview.as_ref().filter(|o| !o.labels.is_empty()) else {
        let paragraph = Paragraph::new(placeholder(&state.overview_state))
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    };

    let runs: Vec<(&ScoreSeries, Vec<Vec<(f64, f64)>>)> = overview
        .series
        .iter()
        .map(|s| (s, segments(&s.points)))
        .collect();

    let mut datasets = Vec::new();
    for (series, segs) in &runs {
        let style = Style::default().fg(to_color(series.color));
        for (i, seg) in segs.iter().enumerate() {
            let graph_type = if seg.len() == 1 {
                GraphType::Scatter
            } else {
                GraphType::Line
            };
            let mut dataset = Dataset::default()
                .marker(Marker::Braille)
                .graph_type(graph_type)
                .style(style)
                .data(seg);
            // Legend entry on the first run only.
            if i == 0 {
                dataset = dataset.name(series.name.clone());
            }
            datasets.push(dataset);
        }
    }

    let x_max = overview.labels.len().saturating_sub(1).max(1) as f64;
    let y = y_bounds(&overview.series);
    let axis_style = Style::default().fg(Color::Gray);

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .style(axis_style)
                .bounds([0.0, x_max])
                .labels(x_labels(&overview.labels)),
        )
        .y_axis(
            Axis::default()
                .style(axis_style)
                .bounds(y)
                .labels(y_labels(y)),
        );
    frame.render_widget(chart, area);
}

/// Split a series into contiguous runs of present points, as `(index, sr)`.
pub fn segments(points: &[Option<i64>]) -> Vec<Vec<(f64, f64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for (i, point) in points.iter().enumerate() {
        match point {
            Some(sr) => current.push((i as f64, *sr as f64)),
            None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// Y range covering every present point, padded by 5% (at least 50).
pub fn y_bounds(series: &[ScoreSeries]) -> [f64; 2] {
    let values = series
        .iter()
        .flat_map(|s| s.points.iter().flatten())
        .map(|&v| v as f64);

    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() {
        return DEFAULT_Y_BOUNDS;
    }
    let pad = ((max - min) * 0.05).max(50.0);
    [(min - pad).max(0.0), max + pad]
}

/// First, middle and last date labels.
pub fn x_labels(labels: &[String]) -> Vec<String> {
    match labels.len() {
        0 => Vec::new(),
        1 | 2 => labels.to_vec(),
        n => vec![
            labels[0].clone(),
            labels[n / 2].clone(),
            labels[n - 1].clone(),
        ],
    }
}

fn y_labels(bounds: [f64; 2]) -> Vec<String> {
    let mid = (bounds[0] + bounds[1]) / 2.0;
    [bounds[0], mid, bounds[1]]
        .iter()
        .map(|v| format!("{:.0}", v))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
