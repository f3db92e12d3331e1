//! Synthetic network statistics generator.
//!
//! A [`MetricSampler`] produces one [`NetworkSample`] per call with no I/O and
//! no error path. The server keeps a single [`SharedSampler`] so the broadcast
//! timer and the HTTP snapshot endpoint draw from the same generator.

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use rand::rngs::{OsRng, StdRng};
use rand::{Rng, SeedableRng};

use crate::models::NetworkSample;

/// Lower bound (inclusive) of generated throughput.
pub const TPS_MIN: u32 = 8_000;
/// Upper bound (exclusive) of generated throughput.
pub const TPS_MAX: u32 = 12_000;
/// Lower bound (inclusive) of generated finality, in seconds.
pub const FINALITY_MIN: f64 = 10.0;
/// Upper bound (exclusive) of generated finality, in seconds.
pub const FINALITY_MAX: f64 = 14.0;
pub const UPTIME: f64 = 99.99;
pub const PEAK_TPS: u32 = 12_487;
pub const AVG_BLOCK_TIME: f64 = 0.8;
pub const NETWORK_HASH_RATE: &str = "42.5 PH/s";

pub const VALIDATOR_BASELINE: u32 = 2_847;
/// Maximum distance of the validator walk from its baseline.
pub const VALIDATOR_SPREAD: u32 = 10;
const VALIDATOR_STEP: i64 = 3;

const TOTAL_BLOCKS_START: u64 = 8_234_567;
const NODES_BASELINE: u32 = 4_921;
const MEMPOOL_BASELINE: u32 = 1_000;

/// Seed used when the operating system cannot provide entropy.
const FALLBACK_SEED: u64 = 0x0C17_4A7E;

/// Produces one sample per invocation.
///
/// Implementations must return quickly and must not fail.
pub trait MetricSampler: Send {
    fn sample(&mut self) -> NetworkSample;
}

/// Random-walk generator matching the public dashboard's figures.
pub struct SyntheticSampler {
    rng: StdRng,
    validators: u32,
    total_blocks: u64,
    last_timestamp: Option<DateTime<Utc>>,
}

impl SyntheticSampler {
    /// Create a sampler seeded from OS entropy, or from a fixed seed if
    /// entropy is unavailable.
    pub fn new() -> Self {
        let rng = StdRng::from_rng(OsRng).unwrap_or_else(|e| {
            tracing::warn!("OS entropy unavailable ({}), using fixed sampler seed", e);
            StdRng::seed_from_u64(FALLBACK_SEED)
        });
        Self::with_rng(rng)
    }

    /// Create a deterministic sampler.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            validators: VALIDATOR_BASELINE,
            total_blocks: TOTAL_BLOCKS_START,
            last_timestamp: None,
        }
    }

    fn next_timestamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let ts = match self.last_timestamp {
            Some(last) if last > now => last,
            _ => now,
        };
        self.last_timestamp = Some(ts);
        ts
    }

    fn next_validators(&mut self) -> u32 {
        let step = self.rng.gen_range(-VALIDATOR_STEP..=VALIDATOR_STEP);
        let low = i64::from(VALIDATOR_BASELINE - VALIDATOR_SPREAD);
        let high = i64::from(VALIDATOR_BASELINE + VALIDATOR_SPREAD);
        let next = (i64::from(self.validators) + step).clamp(low, high);
        // clamped into a u32 range above
        self.validators = next as u32;
        self.validators
    }
}

impl Default for SyntheticSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricSampler for SyntheticSampler {
    fn sample(&mut self) -> NetworkSample {
        let timestamp = self.next_timestamp();
        let tps = self.rng.gen_range(TPS_MIN..TPS_MAX);
        let finality = f64::from(self.rng.gen_range(100u32..140)) / 10.0;
        let active_validators = self.next_validators();
        self.total_blocks += self.rng.gen_range(2..=3);

        NetworkSample {
            timestamp,
            tps,
            finality,
            active_validators,
            uptime: UPTIME,
            peak_tps: PEAK_TPS,
            avg_block_time: AVG_BLOCK_TIME,
            total_blocks: self.total_blocks,
            active_nodes: NODES_BASELINE + self.rng.gen_range(0..=10),
            network_hash_rate: NETWORK_HASH_RATE.to_string(),
            mempool_size: MEMPOOL_BASELINE + self.rng.gen_range(0..=500),
        }
    }
}

/// A sampler shared between the broadcast timer and request handlers.
#[derive(Clone)]
pub struct SharedSampler {
    inner: Arc<Mutex<Box<dyn MetricSampler>>>,
}

impl SharedSampler {
    pub fn new(sampler: impl MetricSampler + 'static) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Box::new(sampler))),
        }
    }

    /// Draw one sample.
    ///
    /// Returns `None` if the sampler panicked; the panic is logged and the
    /// caller is expected to skip this tick.
    pub fn try_sample(&self) -> Option<NetworkSample> {
        let mut sampler = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        match panic::catch_unwind(AssertUnwindSafe(|| sampler.sample())) {
            Ok(sample) => Some(sample),
            Err(_) => {
                tracing::error!("Metric sampler panicked, skipping this sample");
                None
            }
        }
    }
}

impl Default for SharedSampler {
    fn default() -> Self {
        Self::new(SyntheticSampler::new())
    }
}
