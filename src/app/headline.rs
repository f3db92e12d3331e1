//! Headline figures from `GET /api/stats`.

use std::time::Duration;

use crate::error::{CitrateError, CitrateResult};
use crate::models::HeadlineStat;

const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Fetch the headline figures from the server at `api_base`.
pub async fn fetch_headline_stats(api_base: &str) -> CitrateResult<Vec<HeadlineStat>> {
    let url = format!("{}/api/stats", api_base.trim_end_matches('/'));
    let client = reqwest::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(|e| CitrateError::network(&url, e.to_string()))?;

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| CitrateError::network(&url, e.to_string()))?;

    if !response.status().is_success() {
        return Err(CitrateError::network(
            &url,
            format!("unexpected status {}", response.status()),
        ));
    }

    response
        .json::<Vec<HeadlineStat>>()
        .await
        .map_err(|e| CitrateError::network(&url, e.to_string()))
}
