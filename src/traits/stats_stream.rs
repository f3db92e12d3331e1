//! Client transport trait abstraction.
//!
//! The dashboard consumes a [`StatsStream`] rather than a concrete socket so
//! it can be driven by [`crate::adapters::mock::MockStatsStream`] in tests.

use async_trait::async_trait;
use tokio::sync::watch;

use crate::websocket::{ConnectionState, StreamEvent};

/// A source of stream events from the stats endpoint.
#[async_trait]
pub trait StatsStream: Send {
    /// Wait for the next transport event.
    ///
    /// Returns `None` once the transport has shut down for good.
    async fn next_event(&mut self) -> Option<StreamEvent>;

    /// Watch receiver for connection state changes.
    fn state(&self) -> watch::Receiver<ConnectionState>;

    /// Close the connection and stop any reconnect attempts.
    fn shutdown(&self);
}
