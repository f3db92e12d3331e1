//! WebSocket client for the `/ws/stats` endpoint.
//!
//! [`StatsClient`] owns the socket in a background task, reconnects with
//! exponential backoff and reports everything it sees as [`StreamEvent`]s.
//! Parsing and history live in [`crate::client`]; this module only moves
//! frames and tracks connection state.

pub mod client;
pub mod state;

pub use client::{backoff_delay, StatsClient};
pub use state::{ConnectionState, StreamEvent};
