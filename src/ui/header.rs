//! Dashboard header: title on the left, connection indicator on the right.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::theme::{COLOR_DIM, COLOR_DISCONNECTED, COLOR_HEADER, COLOR_LIVE, COLOR_PENDING};
use crate::websocket::ConnectionState;

const TITLE: &str = "CITRATE NETWORK";
const SUBTITLE: &str = "live statistics";

/// Symbol and color for a connection state.
pub fn indicator_style(state: &ConnectionState) -> (char, Color) {
    match state {
        ConnectionState::Open => ('\u{25CF}', COLOR_LIVE),
        ConnectionState::Closed => ('\u{25CB}', COLOR_DISCONNECTED),
        ConnectionState::Connecting | ConnectionState::Reconnecting { .. } => {
            ('\u{25D0}', COLOR_PENDING)
        }
        ConnectionState::Errored(_) => ('\u{2715}', COLOR_DISCONNECTED),
    }
}

/// Indicator text, e.g. `● LIVE` or `◐ RECONNECTING (2)`.
pub fn indicator_text(state: &ConnectionState) -> String {
    let (symbol, _) = indicator_style(state);
    format!("{} {}", symbol, state.label())
}

pub fn render(frame: &mut Frame, area: Rect, state: &ConnectionState) {
    if area.height == 0 {
        return;
    }

    let title = Line::from(vec![
        Span::styled(
            format!(" {}", TITLE),
            Style::default()
                .fg(COLOR_HEADER)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  {}", SUBTITLE), Style::default().fg(COLOR_DIM)),
    ]);
    frame.render_widget(Paragraph::new(title), area);

    let (_, color) = indicator_style(state);
    let indicator = Line::from(Span::styled(
        format!("{} ", indicator_text(state)),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(Paragraph::new(indicator).alignment(Alignment::Right), area);
}
