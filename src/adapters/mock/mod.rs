//! Mock implementations for testing.
//!
//! # Available Mocks
//!
//! - [`MockSubscriber`] - records deliveries and can simulate failures
//! - [`MockStatsStream`] - injects transport events into the dashboard

pub mod stats_stream;
pub mod subscriber;

pub use stats_stream::MockStatsStream;
pub use subscriber::MockSubscriber;
