//! Static headline figures shown above the live charts.

use serde::{Deserialize, Serialize};

/// A single headline figure (e.g. "10,000+" / "TPS Throughput").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadlineStat {
    pub value: String,
    pub label: String,
}

impl HeadlineStat {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// The headline figures served at `GET /api/stats`.
pub fn default_headline_stats() -> Vec<HeadlineStat> {
    vec![
        HeadlineStat::new("10,000+", "TPS Throughput"),
        HeadlineStat::new("< 12s", "Finality Time"),
        HeadlineStat::new("100%", "EVM Compatible"),
        HeadlineStat::new("Native", "AI Support"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_headline_stats() {
        let stats = default_headline_stats();
        assert_eq!(stats.len(), 4);
        assert_eq!(stats[0].value, "10,000+");
        assert_eq!(stats[0].label, "TPS Throughput");
        assert_eq!(stats[3].label, "AI Support");
    }

    #[test]
    fn test_headline_stat_serialization() {
        let stat = HeadlineStat::new("< 12s", "Finality Time");
        let json = serde_json::to_string(&stat).expect("Failed to serialize");
        assert_eq!(json, r#"{"value":"< 12s","label":"Finality Time"}"#);
    }
}
