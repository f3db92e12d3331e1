//! Mock stats stream for dashboard tests.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::{mpsc, watch};

use crate::traits::StatsStream;
use crate::websocket::{ConnectionState, StreamEvent};

/// Stats stream driven entirely by the test.
///
/// Injected events update the connection state the same way the real client
/// does, then are handed out by [`StatsStream::next_event`] in order.
///
/// # Example
///
/// ```ignore
/// let mut stream = MockStatsStream::new();
/// stream.inject(StreamEvent::Opened);
/// stream.inject(StreamEvent::Message(json));
/// stream.finish();
///
/// while let Some(event) = stream.next_event().await {
///     consumer.apply(event);
/// }
/// ```
pub struct MockStatsStream {
    events_tx: Mutex<Option<mpsc::UnboundedSender<StreamEvent>>>,
    events_rx: mpsc::UnboundedReceiver<StreamEvent>,
    state_tx: watch::Sender<ConnectionState>,
    state_rx: watch::Receiver<ConnectionState>,
    shutdown_called: Mutex<bool>,
}

impl MockStatsStream {
    /// Create a mock stream in the `Connecting` state.
    pub fn new() -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(ConnectionState::Connecting);

        Self {
            events_tx: Mutex::new(Some(events_tx)),
            events_rx,
            state_tx,
            state_rx,
            shutdown_called: Mutex::new(false),
        }
    }

    /// Queue an event for the consumer.
    pub fn inject(&self, event: StreamEvent) {
        if let Some(state) = event.resulting_state() {
            let _ = self.state_tx.send(state);
        }
        let guard = self.events_tx.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(tx) = guard.as_ref() {
            // Ignore send errors (receiver dropped)
            let _ = tx.send(event);
        }
    }

    /// Queue several events in order.
    pub fn inject_all(&self, events: impl IntoIterator<Item = StreamEvent>) {
        for event in events {
            self.inject(event);
        }
    }

    /// End the stream once queued events are drained.
    pub fn finish(&self) {
        self.events_tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }

    /// Whether [`StatsStream::shutdown`] was called.
    pub fn was_shut_down(&self) -> bool {
        *self
            .shutdown_called
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MockStatsStream {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StatsStream for MockStatsStream {
    async fn next_event(&mut self) -> Option<StreamEvent> {
        self.events_rx.recv().await
    }

    fn state(&self) -> watch::Receiver<ConnectionState> {
        self.state_rx.clone()
    }

    fn shutdown(&self) {
        *self
            .shutdown_called
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = true;
        let _ = self.state_tx.send(ConnectionState::Closed);
        self.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_injected_events_arrive_in_order() {
        let mut stream = MockStatsStream::new();
        stream.inject_all([
            StreamEvent::Opened,
            StreamEvent::Message("a".into()),
            StreamEvent::Message("b".into()),
        ]);
        stream.finish();

        assert_eq!(stream.next_event().await, Some(StreamEvent::Opened));
        assert_eq!(stream.next_event().await, Some(StreamEvent::Message("a".into())));
        assert_eq!(stream.next_event().await, Some(StreamEvent::Message("b".into())));
        assert_eq!(stream.next_event().await, None);
    }

    #[test]
    fn test_inject_updates_state() {
        let stream = MockStatsStream::new();
        let state = stream.state();
        assert_eq!(*state.borrow(), ConnectionState::Connecting);

        stream.inject(StreamEvent::Opened);
        assert_eq!(*state.borrow(), ConnectionState::Open);

        stream.inject(StreamEvent::Closed);
        assert_eq!(*state.borrow(), ConnectionState::Closed);
    }

    #[tokio::test]
    async fn test_shutdown_ends_stream() {
        let mut stream = MockStatsStream::new();
        stream.inject(StreamEvent::Opened);
        stream.shutdown();

        assert!(stream.was_shut_down());
        assert_eq!(*stream.state().borrow(), ConnectionState::Closed);
        assert_eq!(stream.next_event().await, Some(StreamEvent::Opened));
        assert_eq!(stream.next_event().await, None);
    }
}
