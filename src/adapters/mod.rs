//! Concrete implementations of the trait abstractions in `crate::traits`.
//!
//! # Adapters
//!
//! - [`ChannelSubscriber`] - subscriber backed by a bounded tokio mpsc channel
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::MockSubscriber`] - records deliveries, can be told to fail
//! - [`mock::MockStatsStream`] - event injection for the dashboard

pub mod channel_subscriber;
pub mod mock;

pub use channel_subscriber::ChannelSubscriber;
pub use mock::{MockStatsStream, MockSubscriber};
