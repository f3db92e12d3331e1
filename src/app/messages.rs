//! Messages delivered to the app from background tasks.

use crate::models::HeadlineStat;

#[derive(Debug, Clone, PartialEq)]
pub enum AppMessage {
    /// Headline figures fetched from `/api/stats`
    HeadlineLoaded(Vec<HeadlineStat>),
}
