//! Registry of connections entitled to broadcast samples.
//!
//! Every WebSocket connection registers a [`SampleSubscriber`] here and holds
//! the returned [`Registration`] for as long as its transport lives. Dropping
//! the guard unregisters the subscriber, so a registration can never outlive
//! its connection.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::sampler::SharedSampler;
use crate::traits::{DeliveryError, SampleSubscriber};

/// Opaque handle for one registered subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(Uuid);

impl SubscriberId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // short form is enough to tell connections apart in logs
        let full = self.0.simple().to_string();
        write!(f, "{}", &full[..8])
    }
}

/// Outcome of one broadcast pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Subscribers that accepted the sample.
    pub delivered: usize,
    /// Subscribers whose queue was full; they stay registered.
    pub lagged: usize,
    /// Subscribers found closed and removed in this pass.
    pub removed: usize,
}

type Subscribers = HashMap<SubscriberId, Box<dyn SampleSubscriber>>;

/// Shared set of live subscribers.
///
/// Cloning is cheap; all clones see the same set. Register, unregister and
/// broadcast are serialised by one mutex, which gives at most one delivery
/// per subscriber per broadcast. The subscriber lock is always taken before
/// the sampler lock.
#[derive(Clone)]
pub struct SubscriptionRegistry {
    sampler: SharedSampler,
    subscribers: Arc<Mutex<Subscribers>>,
}

impl SubscriptionRegistry {
    /// Create an empty registry drawing initial samples from `sampler`.
    pub fn new(sampler: SharedSampler) -> Self {
        Self {
            sampler,
            subscribers: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Subscribers> {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a subscriber and hand it one fresh sample right away.
    ///
    /// The initial sample goes to this subscriber only. If that delivery
    /// finds the subscriber already closed it is not inserted; the returned
    /// id is then simply absent from the registry.
    pub fn register(&self, subscriber: impl SampleSubscriber + 'static) -> SubscriberId {
        let id = SubscriberId::new();

        // drawn under the subscriber lock so no tick can slip in between
        let mut subscribers = self.lock();
        if let Some(sample) = self.sampler.try_sample() {
            match subscriber.deliver(Arc::new(sample)) {
                Ok(()) => {}
                Err(DeliveryError::Closed) => {
                    debug!(subscriber = %id, "Subscriber closed before registration");
                    return id;
                }
                Err(DeliveryError::Lagging) => {
                    warn!(subscriber = %id, "Initial sample skipped, subscriber queue full");
                }
            }
        }
        subscribers.insert(id, Box::new(subscriber));
        info!(subscriber = %id, total = subscribers.len(), "Subscriber registered");
        id
    }

    /// Register and return a guard that unregisters on drop.
    pub fn subscribe(&self, subscriber: impl SampleSubscriber + 'static) -> Registration {
        let id = self.register(subscriber);
        Registration {
            registry: self.clone(),
            id,
        }
    }

    /// Remove a subscriber. Returns `false` if it was already gone.
    pub fn unregister(&self, id: SubscriberId) -> bool {
        let mut subscribers = self.lock();
        let removed = subscribers.remove(&id).is_some();
        if removed {
            info!(subscriber = %id, total = subscribers.len(), "Subscriber removed");
        }
        removed
    }

    /// Draw the next sample and deliver it to every registered subscriber.
    ///
    /// The sample is drawn while the subscriber set is locked, so each
    /// subscriber sees samples in the order they were generated. Returns
    /// `None` when the sampler fails; nothing is delivered for that tick.
    ///
    /// A failing subscriber never affects the others. Closed subscribers are
    /// dropped in the same pass.
    pub fn broadcast_next(&self) -> Option<BroadcastReport> {
        let mut subscribers = self.lock();
        let sample = Arc::new(self.sampler.try_sample()?);
        let mut report = BroadcastReport::default();

        subscribers.retain(|id, subscriber| match subscriber.deliver(Arc::clone(&sample)) {
            Ok(()) => {
                report.delivered += 1;
                true
            }
            Err(DeliveryError::Lagging) => {
                warn!(subscriber = %id, "Subscriber lagging, sample skipped");
                report.lagged += 1;
                true
            }
            Err(DeliveryError::Closed) => {
                info!(subscriber = %id, "Subscriber closed, removing");
                report.removed += 1;
                false
            }
        });

        Some(report)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn contains(&self, id: SubscriberId) -> bool {
        self.lock().contains_key(&id)
    }

    /// Drop every subscriber. Used on shutdown so connection tasks end.
    pub fn clear(&self) {
        let mut subscribers = self.lock();
        if !subscribers.is_empty() {
            info!(total = subscribers.len(), "Dropping all subscribers");
        }
        subscribers.clear();
    }

    /// The sampler this registry draws initial samples from.
    pub fn sampler(&self) -> &SharedSampler {
        &self.sampler
    }
}

/// Keeps one subscriber registered until dropped.
pub struct Registration {
    registry: SubscriptionRegistry,
    id: SubscriberId,
}

impl Registration {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Whether the subscriber is still in the registry.
    pub fn is_active(&self) -> bool {
        self.registry.contains(self.id)
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.registry.unregister(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    use crate::adapters::{ChannelSubscriber, MockSubscriber};
    use crate::models::NetworkSample;
    use crate::sampler::{MetricSampler, SyntheticSampler};

    fn registry() -> SubscriptionRegistry {
        SubscriptionRegistry::new(SharedSampler::new(SyntheticSampler::seeded(9)))
    }

    fn broadcast(registry: &SubscriptionRegistry) -> BroadcastReport {
        registry.broadcast_next().expect("sampler works")
    }

    #[test]
    fn test_register_delivers_initial_sample_to_new_subscriber_only() {
        let registry = registry();
        let first = MockSubscriber::new();
        registry.register(first.clone());
        assert_eq!(first.received_count(), 1);

        let second = MockSubscriber::new();
        registry.register(second.clone());
        assert_eq!(second.received_count(), 1);
        assert_eq!(first.received_count(), 1);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_closed_subscriber_is_not_inserted() {
        let registry = registry();
        let id = registry.register(MockSubscriber::failing(DeliveryError::Closed));
        assert!(!registry.contains(id));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_lagging_on_register_still_inserts() {
        let registry = registry();
        let id = registry.register(MockSubscriber::failing(DeliveryError::Lagging));
        assert!(registry.contains(id));
    }

    #[test]
    fn test_unregister_is_idempotent() {
        let registry = registry();
        let id = registry.register(MockSubscriber::new());
        assert!(registry.unregister(id));
        assert!(!registry.unregister(id));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_broadcast_reaches_every_subscriber_once() {
        let registry = registry();
        let subs: Vec<_> = (0..5).map(|_| MockSubscriber::new()).collect();
        for sub in &subs {
            registry.register(sub.clone());
        }

        let report = broadcast(&registry);
        assert_eq!(report.delivered, 5);
        for sub in &subs {
            assert_eq!(sub.received_count(), 2);
        }
    }

    #[test]
    fn test_broadcast_shares_one_allocation() {
        let registry = registry();
        let a = MockSubscriber::new();
        let b = MockSubscriber::new();
        registry.register(a.clone());
        registry.register(b.clone());

        broadcast(&registry);
        let from_a = a.received().pop().expect("sample");
        let from_b = b.received().pop().expect("sample");
        assert!(Arc::ptr_eq(&from_a, &from_b));
    }

    #[test]
    fn test_failed_subscriber_does_not_affect_others() {
        let registry = registry();
        let broken = MockSubscriber::new();
        let healthy = MockSubscriber::new();
        let broken_id = registry.register(broken.clone());
        let healthy_id = registry.register(healthy.clone());

        broken.fail_with(DeliveryError::Closed);
        let report = broadcast(&registry);

        assert_eq!(
            report,
            BroadcastReport {
                delivered: 1,
                lagged: 0,
                removed: 1
            }
        );
        assert_eq!(healthy.received_count(), 2);
        assert!(!registry.contains(broken_id));
        assert!(registry.contains(healthy_id));
    }

    #[test]
    fn test_lagging_subscriber_stays_registered() {
        let registry = registry();
        let slow = MockSubscriber::new();
        let id = registry.register(slow.clone());

        slow.fail_with(DeliveryError::Lagging);
        let report = broadcast(&registry);
        assert_eq!(report.lagged, 1);
        assert!(registry.contains(id));

        slow.recover();
        broadcast(&registry);
        assert_eq!(slow.received_count(), 2);
    }

    #[test]
    fn test_registration_guard_unregisters_on_drop() {
        let registry = registry();
        let guards: Vec<_> = (0..10)
            .map(|_| registry.subscribe(MockSubscriber::new()))
            .collect();
        assert_eq!(registry.len(), 10);
        assert!(guards.iter().all(Registration::is_active));

        drop(guards);
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_guard_after_manual_unregister() {
        let registry = registry();
        let guard = registry.subscribe(MockSubscriber::new());
        assert!(registry.unregister(guard.id()));
        assert!(!guard.is_active());
        // dropping after removal is a no-op
        drop(guard);
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_dropped_channel_is_removed_on_next_broadcast() {
        let registry = registry();
        let (sub, rx) = ChannelSubscriber::channel(4);
        let id = registry.register(sub);
        drop(rx);

        let report = broadcast(&registry);
        assert_eq!(report.removed, 1);
        assert!(!registry.contains(id));
    }

    #[test]
    fn test_clear_drops_everyone() {
        let registry = registry();
        for _ in 0..3 {
            registry.register(MockSubscriber::new());
        }
        registry.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_subscriber_id_display_is_short() {
        let id = SubscriberId::new();
        assert_eq!(id.to_string().len(), 8);
    }

    fn delivered_blocks(sub: &MockSubscriber) -> Vec<u64> {
        sub.received().iter().map(|s| s.total_blocks).collect()
    }

    #[test]
    fn test_initial_sample_precedes_next_tick() {
        let registry = registry();
        let early = MockSubscriber::new();
        registry.register(early.clone());
        broadcast(&registry);

        let late = MockSubscriber::new();
        registry.register(late.clone());
        broadcast(&registry);

        let early_blocks = delivered_blocks(&early);
        let late_blocks = delivered_blocks(&late);
        assert_eq!(early_blocks.len(), 3);
        assert_eq!(late_blocks.len(), 2);
        assert!(early_blocks.windows(2).all(|w| w[0] < w[1]));
        assert!(late_blocks[0] < late_blocks[1]);
        // the tick after registration is newer than the initial sample
        assert_eq!(late_blocks[1], early_blocks[2]);
    }

    #[test]
    fn test_concurrent_register_and_broadcast_keep_generation_order() {
        let registry = registry();
        let ticker = {
            let registry = registry.clone();
            thread::spawn(move || {
                for _ in 0..500 {
                    broadcast(&registry);
                }
            })
        };

        let subs: Vec<_> = (0..200)
            .map(|_| {
                let sub = MockSubscriber::new();
                registry.register(sub.clone());
                sub
            })
            .collect();
        ticker.join().expect("ticker thread");

        for sub in &subs {
            let blocks = delivered_blocks(sub);
            assert!(
                blocks.windows(2).all(|w| w[0] < w[1]),
                "delivered out of generation order: {:?}",
                blocks
            );
        }
    }

    struct BrokenSampler;

    impl MetricSampler for BrokenSampler {
        fn sample(&mut self) -> NetworkSample {
            panic!("sampler offline");
        }
    }

    #[test]
    fn test_sampler_failure_delivers_nothing() {
        let registry = SubscriptionRegistry::new(SharedSampler::new(BrokenSampler));
        let sub = MockSubscriber::new();
        let id = registry.register(sub.clone());

        assert!(registry.contains(id));
        assert!(registry.broadcast_next().is_none());
        assert_eq!(sub.received_count(), 0);
    }
}
