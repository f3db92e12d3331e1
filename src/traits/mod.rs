//! Trait abstractions at the transport seams.
//!
//! # Traits
//!
//! - [`SampleSubscriber`] - where the server registry hands samples to a connection
//! - [`StatsStream`] - where the dashboard pulls events from the client transport

pub mod stats_stream;
pub mod subscriber;

pub use stats_stream::StatsStream;
pub use subscriber::{DeliveryError, SampleSubscriber};
