//! Row of stat cards and the optional headline row.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::theme::{COLOR_ACCENT, COLOR_BORDER, COLOR_DIM};
use crate::client::HistoryBuffer;
use crate::models::HeadlineStat;

/// Shown in place of a figure before the first sample arrives.
pub const EMPTY_FIGURE: &str = "--";

/// One card: figure plus label.
#[derive(Debug, Clone, PartialEq)]
pub struct StatCard {
    pub label: &'static str,
    pub value: String,
}

/// Cards derived from the history window.
///
/// Current figures come from the latest sample; finality is averaged over
/// the whole window.
pub fn stat_cards(history: &HistoryBuffer) -> Vec<StatCard> {
    let latest = history.latest();
    let average_finality = history.average_finality();

    vec![
        StatCard {
            label: "Current TPS",
            value: latest
                .map(|s| format_thousands(u64::from(s.tps)))
                .unwrap_or_else(|| EMPTY_FIGURE.to_string()),
        },
        StatCard {
            label: "Avg Finality",
            value: average_finality
                .map(|f| format!("{:.1}s", f))
                .unwrap_or_else(|| EMPTY_FIGURE.to_string()),
        },
        StatCard {
            label: "Active Validators",
            value: latest
                .map(|s| format_thousands(u64::from(s.active_validators)))
                .unwrap_or_else(|| EMPTY_FIGURE.to_string()),
        },
        StatCard {
            label: "Uptime",
            value: latest
                .map(|s| format!("{:.2}%", s.uptime))
                .unwrap_or_else(|| EMPTY_FIGURE.to_string()),
        },
    ]
}

/// `12487` -> `12,487`
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn render_card(frame: &mut Frame, area: Rect, value: &str, label: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(COLOR_BORDER));
    let lines = vec![
        Line::from(Span::styled(
            value.to_string(),
            Style::default()
                .fg(COLOR_ACCENT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(label.to_string(), Style::default().fg(COLOR_DIM))),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block),
        area,
    );
}

fn render_row<'a>(frame: &mut Frame, area: Rect, cards: impl ExactSizeIterator<Item = (&'a str, &'a str)>) {
    let count = cards.len();
    if count == 0 {
        return;
    }
    let constraints = vec![Constraint::Ratio(1, count as u32); count];
    let columns = Layout::horizontal(constraints).split(area);
    for ((value, label), column) in cards.zip(columns.iter()) {
        render_card(frame, *column, value, label);
    }
}

/// Render the live stat cards.
pub fn render(frame: &mut Frame, area: Rect, history: &HistoryBuffer) {
    let cards = stat_cards(history);
    render_row(
        frame,
        area,
        cards.iter().map(|c| (c.value.as_str(), c.label)),
    );
}

/// Render the headline figures.
pub fn render_headline(frame: &mut Frame, area: Rect, headline: &[HeadlineStat]) {
    render_row(
        frame,
        area,
        headline.iter().map(|h| (h.value.as_str(), h.label.as_str())),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::{MetricSampler, SyntheticSampler};

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1_000), "1,000");
        assert_eq!(format_thousands(12_487), "12,487");
        assert_eq!(format_thousands(8_234_567), "8,234,567");
    }

    #[test]
    fn test_empty_history_shows_placeholders() {
        let cards = stat_cards(&HistoryBuffer::default());
        assert_eq!(cards.len(), 4);
        assert!(cards.iter().all(|c| c.value == EMPTY_FIGURE));
    }

    #[test]
    fn test_cards_use_latest_sample() {
        let mut history = HistoryBuffer::default();
        let mut sampler = SyntheticSampler::seeded(8);
        history.push(sampler.sample());
        let latest = sampler.sample();
        let tps = latest.tps;
        history.push(latest);

        let cards = stat_cards(&history);
        assert_eq!(cards[0].value, format_thousands(u64::from(tps)));
        assert_eq!(cards[3].value, "99.99%");
        assert!(cards[1].value.ends_with('s'));
    }
}
