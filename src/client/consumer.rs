//! Stream consumer state machine.

use thiserror::Error;
use tracing::{debug, warn};

use super::history::HistoryBuffer;
use crate::models::NetworkSample;
use crate::websocket::{ConnectionState, StreamEvent};

/// Longest payload excerpt written to the log for a malformed message.
const LOG_EXCERPT_CHARS: usize = 120;

/// A text frame that is not a valid sample.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("invalid sample payload: {0}")]
    InvalidPayload(String),
}

/// What applying one event did to the consumer.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsumerUpdate {
    /// The connection state changed.
    StateChanged(ConnectionState),
    /// A sample was appended to the history.
    Sample,
    /// A malformed message was dropped.
    Dropped,
    /// A message arrived while not open and was ignored.
    Ignored,
}

/// Parse one text frame into a sample.
pub fn parse_sample(text: &str) -> Result<NetworkSample, ParseError> {
    serde_json::from_str(text).map_err(|e| ParseError::InvalidPayload(e.to_string()))
}

fn excerpt(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(LOG_EXCERPT_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

/// Tracks connection health and a rolling window of samples.
///
/// Feeding it arbitrary events never panics. Malformed payloads are logged,
/// counted and dropped without touching the history.
#[derive(Debug, Clone)]
pub struct StreamConsumer {
    state: ConnectionState,
    history: HistoryBuffer,
    malformed: u64,
    received: u64,
}

impl StreamConsumer {
    pub fn new(history_capacity: usize) -> Self {
        Self {
            state: ConnectionState::Connecting,
            history: HistoryBuffer::new(history_capacity),
            malformed: 0,
            received: 0,
        }
    }

    /// Apply one transport event.
    pub fn apply(&mut self, event: StreamEvent) -> ConsumerUpdate {
        match event {
            StreamEvent::Message(text) => self.on_message(&text),
            other => {
                // every non-message event carries a state
                let state = other.resulting_state().unwrap_or(ConnectionState::Closed);
                debug!("Stats stream state: {}", state);
                self.state = state.clone();
                ConsumerUpdate::StateChanged(state)
            }
        }
    }

    fn on_message(&mut self, text: &str) -> ConsumerUpdate {
        if !self.state.is_live() {
            debug!("Ignoring message received while {}", self.state);
            return ConsumerUpdate::Ignored;
        }

        match parse_sample(text) {
            Ok(sample) => {
                self.received += 1;
                self.history.push(sample);
                ConsumerUpdate::Sample
            }
            Err(e) => {
                self.malformed += 1;
                warn!("Dropping malformed stats message: {} - {}", e, excerpt(text));
                ConsumerUpdate::Dropped
            }
        }
    }

    /// True while the stream is open.
    pub fn is_live(&self) -> bool {
        self.state.is_live()
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn latest(&self) -> Option<&NetworkSample> {
        self.history.latest()
    }

    /// Messages dropped because they did not parse.
    pub fn malformed_count(&self) -> u64 {
        self.malformed
    }

    /// Samples successfully parsed since creation.
    pub fn received_count(&self) -> u64 {
        self.received
    }
}

impl Default for StreamConsumer {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_HISTORY_CAPACITY)
    }
}
