//! Time-series charts over the history window.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use super::theme::{COLOR_BORDER, COLOR_DIM, COLOR_FINALITY, COLOR_TPS};
use crate::client::HistoryBuffer;

pub const WAITING_PLACEHOLDER: &str = "Waiting for data...";

/// Y bounds with a little headroom. Flat series get a fixed spread so the
/// line is not drawn on the border.
pub fn y_bounds(points: &[(f64, f64)], min_spread: f64) -> [f64; 2] {
    let (min, max) = points
        .iter()
        .map(|(_, y)| *y)
        .filter(|y| y.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| {
            (lo.min(y), hi.max(y))
        });

    if !min.is_finite() || !max.is_finite() {
        return [0.0, min_spread];
    }

    let spread = (max - min).max(min_spread);
    let pad = spread * 0.1;
    let mid = (max + min) / 2.0;
    [mid - spread / 2.0 - pad, mid + spread / 2.0 + pad]
}

fn chart_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(COLOR_BORDER))
        .title(Span::styled(format!(" {} ", title), Style::default().fg(COLOR_DIM)))
}

struct Series<'a> {
    title: &'a str,
    name: &'a str,
    color: Color,
    points: Vec<(f64, f64)>,
    min_spread: f64,
    precision: usize,
}

fn render_series(frame: &mut Frame, area: Rect, capacity: usize, series: Series<'_>) {
    if series.points.is_empty() {
        let placeholder = Paragraph::new(Line::from(Span::styled(
            WAITING_PLACEHOLDER,
            Style::default().fg(COLOR_DIM),
        )))
        .alignment(Alignment::Center)
        .block(chart_block(series.title));
        frame.render_widget(placeholder, area);
        return;
    }

    let x_max = capacity.saturating_sub(1).max(1) as f64;
    let [y_min, y_max] = y_bounds(&series.points, series.min_spread);
    let y_labels = vec![
        format!("{:.*}", series.precision, y_min),
        format!("{:.*}", series.precision, (y_min + y_max) / 2.0),
        format!("{:.*}", series.precision, y_max),
    ];

    let dataset = Dataset::default()
        .name(series.name)
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(series.color))
        .data(&series.points);

    let chart = Chart::new(vec![dataset])
        .block(chart_block(series.title))
        .x_axis(
            Axis::default()
                .style(Style::default().fg(COLOR_DIM))
                .bounds([0.0, x_max]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(COLOR_DIM))
                .bounds([y_min, y_max])
                .labels(y_labels),
        );
    frame.render_widget(chart, area);
}

pub fn render_tps(frame: &mut Frame, area: Rect, history: &HistoryBuffer) {
    render_series(
        frame,
        area,
        history.capacity(),
        Series {
            title: "Transactions per second",
            name: "tps",
            color: COLOR_TPS,
            points: history.tps_series(),
            min_spread: 100.0,
            precision: 0,
        },
    );
}

pub fn render_finality(frame: &mut Frame, area: Rect, history: &HistoryBuffer) {
    render_series(
        frame,
        area,
        history.capacity(),
        Series {
            title: "Finality (s)",
            name: "finality",
            color: COLOR_FINALITY,
            points: history.finality_series(),
            min_spread: 1.0,
            precision: 1,
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_y_bounds_empty_series() {
        assert_eq!(y_bounds(&[], 5.0), [0.0, 5.0]);
    }

    #[test]
    fn test_y_bounds_flat_series_gets_spread() {
        let [lo, hi] = y_bounds(&[(0.0, 12.0), (1.0, 12.0)], 1.0);
        assert!(lo < 12.0 && hi > 12.0);
        assert!((hi - lo) >= 1.0);
    }

    #[test]
    fn test_y_bounds_contain_every_point() {
        let points = [(0.0, 8_100.0), (1.0, 11_900.0), (2.0, 9_000.0)];
        let [lo, hi] = y_bounds(&points, 100.0);
        assert!(points.iter().all(|(_, y)| *y > lo && *y < hi));
    }

    #[test]
    fn test_y_bounds_ignore_nan() {
        let [lo, hi] = y_bounds(&[(0.0, f64::NAN), (1.0, 10.0)], 1.0);
        assert!(lo.is_finite() && hi.is_finite());
    }
}
