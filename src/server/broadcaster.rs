//! Process-wide broadcast timer.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

use super::registry::SubscriptionRegistry;

/// One repeating schedule that samples once per tick and fans the sample out
/// to the registry.
///
/// The first broadcast fires one full period after [`spawn`](Self::spawn);
/// new connections get their first sample at registration instead.
#[derive(Debug, Clone, Copy)]
pub struct BroadcastTimer {
    period: Duration,
}

impl BroadcastTimer {
    pub fn new(period: Duration) -> Self {
        Self { period }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Start the timer task on the current runtime.
    ///
    /// Samples come from the registry's own sampler.
    pub fn spawn(self, registry: SubscriptionRegistry) -> BroadcasterHandle {
        let ticks = Arc::new(AtomicU64::new(0));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(run(self.period, registry, Arc::clone(&ticks), shutdown_rx));

        info!(period_ms = self.period.as_millis() as u64, "Broadcast timer started");

        BroadcasterHandle {
            period: self.period,
            ticks,
            shutdown_tx,
            task: Some(task),
        }
    }
}

async fn run(
    period: Duration,
    registry: SubscriptionRegistry,
    ticks: Arc<AtomicU64>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = shutdown_rx.changed() => break,
        }

        let Some(report) = registry.broadcast_next() else {
            // sampler failure costs this tick only
            continue;
        };
        let tick = ticks.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(
            tick,
            delivered = report.delivered,
            lagged = report.lagged,
            removed = report.removed,
            "Broadcast tick"
        );
    }

    info!("Broadcast timer stopped");
}

/// Owns the running timer task.
///
/// Dropping the handle aborts the task.
pub struct BroadcasterHandle {
    period: Duration,
    ticks: Arc<AtomicU64>,
    shutdown_tx: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl BroadcasterHandle {
    /// Number of completed broadcasts.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Shared tick counter, for handlers that outlive a borrow of the handle.
    pub fn tick_counter(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.ticks)
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stop the timer and wait for its task. No broadcast runs afterwards.
    pub async fn shutdown(mut self) {
        let _ = self.shutdown_tx.send(true);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for BroadcasterHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MockSubscriber;
    use crate::models::NetworkSample;
    use crate::sampler::{MetricSampler, SharedSampler, SyntheticSampler};

    fn setup() -> SubscriptionRegistry {
        SubscriptionRegistry::new(SharedSampler::new(SyntheticSampler::seeded(13)))
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_waits_one_period() {
        let registry = setup();
        let sub = MockSubscriber::new();
        registry.register(sub.clone());

        let handle = BroadcastTimer::new(Duration::from_secs(2)).spawn(registry);

        time::sleep(Duration::from_millis(1_900)).await;
        assert_eq!(handle.ticks(), 0);
        assert_eq!(sub.received_count(), 1);

        time::sleep(Duration::from_millis(200)).await;
        assert_eq!(handle.ticks(), 1);
        assert_eq!(sub.received_count(), 2);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_follow_period() {
        let registry = setup();
        let sub = MockSubscriber::new();
        registry.register(sub.clone());

        let handle = BroadcastTimer::new(Duration::from_secs(2)).spawn(registry);
        time::sleep(Duration::from_millis(4_500)).await;

        assert_eq!(handle.ticks(), 2);
        assert_eq!(sub.received_count(), 3);
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_broadcast_after_shutdown() {
        let registry = setup();
        let sub = MockSubscriber::new();
        registry.register(sub.clone());

        let handle = BroadcastTimer::new(Duration::from_millis(100)).spawn(registry);
        time::sleep(Duration::from_millis(250)).await;
        handle.shutdown().await;

        let before = sub.received_count();
        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(sub.received_count(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_aborts_task() {
        let registry = setup();
        let sub = MockSubscriber::new();
        registry.register(sub.clone());

        let handle = BroadcastTimer::new(Duration::from_millis(100)).spawn(registry);
        assert!(handle.is_running());
        drop(handle);

        time::sleep(Duration::from_secs(1)).await;
        assert_eq!(sub.received_count(), 1);
    }

    struct FlakySampler {
        inner: SyntheticSampler,
        calls: u32,
    }

    impl MetricSampler for FlakySampler {
        fn sample(&mut self) -> NetworkSample {
            self.calls += 1;
            if self.calls == 2 {
                panic!("transient sampler failure");
            }
            self.inner.sample()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_sampler_failure_skips_one_tick() {
        let sampler = SharedSampler::new(FlakySampler {
            inner: SyntheticSampler::seeded(1),
            calls: 0,
        });
        let registry = SubscriptionRegistry::new(sampler);
        let sub = MockSubscriber::new();
        // call 1: initial sample
        registry.register(sub.clone());

        let handle = BroadcastTimer::new(Duration::from_millis(100)).spawn(registry);
        // call 2 panics, later calls succeed
        time::sleep(Duration::from_millis(450)).await;

        assert_eq!(handle.ticks(), 3);
        assert_eq!(sub.received_count(), 4);
        handle.shutdown().await;
    }
}
