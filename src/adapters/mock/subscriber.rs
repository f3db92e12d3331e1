//! Mock subscriber for registry tests.
//!
//! Clones share state, so a test can keep one handle while the registry
//! owns another.

use std::sync::{Arc, Mutex, PoisonError};

use crate::models::NetworkSample;
use crate::traits::{DeliveryError, SampleSubscriber};

#[derive(Default)]
struct MockState {
    received: Vec<Arc<NetworkSample>>,
    fail_with: Option<DeliveryError>,
    attempts: usize,
}

/// Subscriber that records every delivered sample.
///
/// # Example
///
/// ```ignore
/// let sub = MockSubscriber::new();
/// let id = registry.register(sub.clone());
/// assert_eq!(sub.received_count(), 1);
///
/// sub.fail_with(DeliveryError::Closed);
/// registry.broadcast_next();
/// assert!(!registry.contains(id));
/// ```
#[derive(Clone, Default)]
pub struct MockSubscriber {
    state: Arc<Mutex<MockState>>,
}

impl MockSubscriber {
    pub fn new() -> Self {
        Self::default()
    }

    /// A subscriber whose every delivery fails with `err`.
    pub fn failing(err: DeliveryError) -> Self {
        let sub = Self::new();
        sub.fail_with(err);
        sub
    }

    /// Make subsequent deliveries fail with `err`.
    pub fn fail_with(&self, err: DeliveryError) {
        self.lock().fail_with = Some(err);
    }

    /// Make subsequent deliveries succeed again.
    pub fn recover(&self) {
        self.lock().fail_with = None;
    }

    /// Samples successfully delivered so far.
    pub fn received(&self) -> Vec<Arc<NetworkSample>> {
        self.lock().received.clone()
    }

    pub fn received_count(&self) -> usize {
        self.lock().received.len()
    }

    /// Number of delivery attempts, successful or not.
    pub fn attempts(&self) -> usize {
        self.lock().attempts
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SampleSubscriber for MockSubscriber {
    fn deliver(&self, sample: Arc<NetworkSample>) -> Result<(), DeliveryError> {
        let mut state = self.lock();
        state.attempts += 1;
        if let Some(err) = state.fail_with {
            return Err(err);
        }
        state.received.push(sample);
        Ok(())
    }
}
