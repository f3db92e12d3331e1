//! Channel-backed subscriber used by WebSocket connections.

use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};

use crate::models::NetworkSample;
use crate::traits::{DeliveryError, SampleSubscriber};

/// Subscriber that queues samples on a bounded mpsc channel.
///
/// The connection task owns the receiving half and writes each sample to the
/// socket. Dropping that receiver makes every later delivery report
/// [`DeliveryError::Closed`].
pub struct ChannelSubscriber {
    tx: mpsc::Sender<Arc<NetworkSample>>,
}

impl ChannelSubscriber {
    pub fn new(tx: mpsc::Sender<Arc<NetworkSample>>) -> Self {
        Self { tx }
    }

    /// Create a subscriber together with the receiver its connection drains.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Arc<NetworkSample>>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self::new(tx), rx)
    }
}

impl SampleSubscriber for ChannelSubscriber {
    fn deliver(&self, sample: Arc<NetworkSample>) -> Result<(), DeliveryError> {
        self.tx.try_send(sample).map_err(|e| match e {
            TrySendError::Full(_) => DeliveryError::Lagging,
            TrySendError::Closed(_) => DeliveryError::Closed,
        })
    }
}
