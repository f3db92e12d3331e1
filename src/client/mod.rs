//! Client-side consumption of the stats stream.
//!
//! [`StreamConsumer`] turns transport events into connection state and a
//! bounded [`HistoryBuffer`] of parsed samples for the charts.

mod consumer;
mod history;

pub use consumer::{ConsumerUpdate, ParseError, StreamConsumer};
pub use history::HistoryBuffer;
