//! Bounded FIFO window of recent samples.

use std::collections::vec_deque::{self, VecDeque};

use crate::config::DEFAULT_HISTORY_CAPACITY;
use crate::models::NetworkSample;

/// The most recent `capacity` samples in arrival order.
///
/// Pushing onto a full buffer evicts the oldest sample.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    samples: VecDeque<NetworkSample>,
    capacity: usize,
}

impl HistoryBuffer {
    /// Create an empty buffer. A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, returning the evicted one if the buffer was full.
    pub fn push(&mut self, sample: NetworkSample) -> Option<NetworkSample> {
        let evicted = if self.samples.len() == self.capacity {
            self.samples.pop_front()
        } else {
            None
        };
        self.samples.push_back(sample);
        evicted
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Oldest to newest.
    pub fn iter(&self) -> vec_deque::Iter<'_, NetworkSample> {
        self.samples.iter()
    }

    pub fn latest(&self) -> Option<&NetworkSample> {
        self.samples.back()
    }

    pub fn oldest(&self) -> Option<&NetworkSample> {
        self.samples.front()
    }

    /// `(index, tps)` points for charting, oldest first.
    pub fn tps_series(&self) -> Vec<(f64, f64)> {
        self.series(|s| f64::from(s.tps))
    }

    /// `(index, finality)` points for charting, oldest first.
    pub fn finality_series(&self) -> Vec<(f64, f64)> {
        self.series(|s| s.finality)
    }

    pub fn average_finality(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        let total: f64 = self.samples.iter().map(|s| s.finality).sum();
        Some(total / self.samples.len() as f64)
    }

    fn series(&self, value: impl Fn(&NetworkSample) -> f64) -> Vec<(f64, f64)> {
        self.samples
            .iter()
            .enumerate()
            .map(|(i, s)| (i as f64, value(s)))
            .collect()
    }
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl<'a> IntoIterator for &'a HistoryBuffer {
    type Item = &'a NetworkSample;
    type IntoIter = vec_deque::Iter<'a, NetworkSample>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
