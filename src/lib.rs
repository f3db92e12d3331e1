//! Citrate - live network statistics over WebSocket
//!
//! The server side samples synthetic network figures on one shared timer and
//! fans them out to every connected client. The client side consumes the
//! stream into a bounded history and draws it in the terminal.
//!
//! This library exposes modules for use in integration tests.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod sampler;
pub mod server;
pub mod terminal;
pub mod traits;
pub mod ui;
pub mod websocket;
