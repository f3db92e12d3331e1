//! Wire and display models shared by the server, the stream client and the UI.

mod headline;
mod network;

pub use headline::{default_headline_stats, HeadlineStat};
pub use network::NetworkSample;
