//! Subscriber trait used by the server-side registry.
//!
//! The registry never touches sockets directly. Each connection is wrapped in
//! a [`SampleSubscriber`] whose `deliver` must not block; slow or dead
//! transports report an error instead.

use std::fmt;
use std::sync::Arc;

use crate::models::NetworkSample;

/// Why a sample could not be handed to a subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryError {
    /// The transport behind this subscriber is gone.
    Closed,
    /// The subscriber's outbound queue is full; this sample was skipped.
    Lagging,
}

impl fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryError::Closed => write!(f, "subscriber closed"),
            DeliveryError::Lagging => write!(f, "subscriber lagging, sample skipped"),
        }
    }
}

impl std::error::Error for DeliveryError {}

/// A connection that can receive broadcast samples.
pub trait SampleSubscriber: Send + Sync {
    /// Queue a sample for this subscriber without blocking.
    fn deliver(&self, sample: Arc<NetworkSample>) -> Result<(), DeliveryError>;
}
