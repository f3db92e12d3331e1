//! Input, stream and message handlers for [`App`].

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::debug;

use super::{App, AppMessage};
use crate::client::ConsumerUpdate;
use crate::websocket::StreamEvent;

impl App {
    /// Handle a key press. Returns true if the key was consumed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.quit();
                true
            }
            KeyCode::Char('q') | KeyCode::Esc => {
                self.quit();
                true
            }
            _ => false,
        }
    }

    /// Feed one transport event to the consumer.
    pub fn handle_stream_event(&mut self, event: StreamEvent) {
        match self.consumer.apply(event) {
            ConsumerUpdate::StateChanged(_) | ConsumerUpdate::Sample => self.mark_dirty(),
            // footer shows the malformed count
            ConsumerUpdate::Dropped => self.mark_dirty(),
            ConsumerUpdate::Ignored => {}
        }
    }

    pub fn handle_message(&mut self, msg: AppMessage) {
        match msg {
            AppMessage::HeadlineLoaded(stats) => {
                debug!("Loaded {} headline figures", stats.len());
                self.headline = stats;
                self.mark_dirty();
            }
        }
    }
}
