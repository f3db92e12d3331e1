//! The network statistics sample pushed to every subscriber once per tick.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One synthetic network-statistics record.
///
/// Samples are immutable once built: the broadcast path shares them as
/// `Arc<NetworkSample>` and every tick produces a new one. Every field is
/// required on the wire, so a payload missing any of them fails to parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSample {
    /// Generation time, serialised as RFC 3339
    pub timestamp: DateTime<Utc>,
    /// Throughput estimate in transactions per second
    pub tps: u32,
    /// Time to finality in seconds, one decimal place
    pub finality: f64,
    pub active_validators: u32,
    /// Uptime percentage
    pub uptime: f64,
    #[serde(rename = "peakTPS")]
    pub peak_tps: u32,
    /// Average block time in seconds
    pub avg_block_time: f64,
    pub total_blocks: u64,
    pub active_nodes: u32,
    pub network_hash_rate: String,
    pub mempool_size: u32,
}
