//! Terminal dashboard for the stats stream.
//!
//! ```text
//! CITRATE NETWORK  live statistics                     ● LIVE
//! [ headline figures, when available ]
//! [ tps ] [ avg finality ] [ validators ] [ uptime ]
//! [ tps chart                                       ]
//! [ finality chart                                  ]
//! q quit  ws://host/ws/stats
//! ```

pub mod charts;
mod context;
pub mod header;
pub mod stat_cards;
pub mod theme;

pub use context::DashboardContext;

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use theme::COLOR_DIM;

const CARD_HEIGHT: u16 = 4;

/// Render one full dashboard frame.
pub fn render(frame: &mut Frame, ctx: &DashboardContext<'_>) {
    let area = frame.area();
    let headline_height = if ctx.headline.is_empty() { 0 } else { CARD_HEIGHT };

    let rows = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(headline_height),
        Constraint::Length(CARD_HEIGHT),
        Constraint::Min(4),
        Constraint::Length(1),
    ])
    .split(area);

    header::render(frame, rows[0], ctx.state);
    if headline_height > 0 {
        stat_cards::render_headline(frame, rows[1], ctx.headline);
    }
    stat_cards::render(frame, rows[2], ctx.history);

    let charts = Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[3]);
    charts::render_tps(frame, charts[0], ctx.history);
    charts::render_finality(frame, charts[1], ctx.history);

    render_footer(frame, rows[4], ctx);
}

fn render_footer(frame: &mut Frame, area: Rect, ctx: &DashboardContext<'_>) {
    let mut text = format!(" q quit  {}", ctx.url);
    if ctx.malformed > 0 {
        text.push_str(&format!("  {} malformed dropped", ctx.malformed));
    }
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(text, Style::default().fg(COLOR_DIM)))),
        area,
    );
}
