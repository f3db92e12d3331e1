//! Dashboard application state and event loop.
//!
//! [`App`] owns the [`StreamConsumer`] and everything the dashboard draws.
//! [`run_app`] drives it from three sources: terminal input, the stats
//! stream and background [`AppMessage`]s.

mod event_loop;
mod handlers;
mod headline;
mod messages;

pub use event_loop::{run_app, run_watch, REDRAW_INTERVAL};
pub use headline::fetch_headline_stats;
pub use messages::AppMessage;

use tokio::sync::mpsc;

use crate::client::StreamConsumer;
use crate::config::ClientConfig;
use crate::models::HeadlineStat;
use crate::ui::DashboardContext;

/// Dashboard state.
pub struct App {
    consumer: StreamConsumer,
    headline: Vec<HeadlineStat>,
    url: String,
    /// Set when the user asked to quit
    pub should_quit: bool,
    /// Set when the next loop iteration must redraw
    pub needs_redraw: bool,
    message_tx: mpsc::UnboundedSender<AppMessage>,
    message_rx: Option<mpsc::UnboundedReceiver<AppMessage>>,
}

impl App {
    pub fn new(config: &ClientConfig) -> Self {
        let (message_tx, message_rx) = mpsc::unbounded_channel();
        Self {
            consumer: StreamConsumer::new(config.history_capacity),
            headline: Vec::new(),
            url: config.url.clone(),
            should_quit: false,
            needs_redraw: true,
            message_tx,
            message_rx: Some(message_rx),
        }
    }

    /// Sender for background tasks reporting back to the app.
    pub fn message_sender(&self) -> mpsc::UnboundedSender<AppMessage> {
        self.message_tx.clone()
    }

    pub fn consumer(&self) -> &StreamConsumer {
        &self.consumer
    }

    pub fn headline(&self) -> &[HeadlineStat] {
        &self.headline
    }

    pub fn mark_dirty(&mut self) {
        self.needs_redraw = true;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Borrowed inputs for one frame.
    pub fn context(&self) -> DashboardContext<'_> {
        DashboardContext {
            state: self.consumer.state(),
            history: self.consumer.history(),
            headline: &self.headline,
            url: &self.url,
            malformed: self.consumer.malformed_count(),
        }
    }
}
