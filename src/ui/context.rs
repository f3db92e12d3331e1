//! Borrowed view of everything one frame needs.

use crate::client::HistoryBuffer;
use crate::models::HeadlineStat;
use crate::websocket::ConnectionState;

/// Read-only inputs for one dashboard frame.
#[derive(Debug, Clone, Copy)]
pub struct DashboardContext<'a> {
    pub state: &'a ConnectionState,
    pub history: &'a HistoryBuffer,
    /// Headline figures; empty when they could not be fetched
    pub headline: &'a [HeadlineStat],
    /// Stream URL shown in the footer
    pub url: &'a str,
    /// Messages dropped as malformed
    pub malformed: u64,
}
