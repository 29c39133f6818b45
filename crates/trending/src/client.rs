// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::{PipelineError, Result};
use diagnostics::*;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Largest page the videos endpoint returns
pub const MAX_PAGE_SIZE: u32 = 50;

const PARTS: &str = "snippet,contentDetails,statistics";
const CHART: &str = "mostPopular";

/// Longest slice of an upstream error body kept in error messages
const ERROR_BODY_LIMIT: usize = 512;

/// Parameters of one "most popular" listing call
#[derive(Debug, Clone)]
pub struct TrendingQuery<'a> {
    pub api_key: &'a str,
    pub region_code: &'a str,
    pub max_results: u32,
}

/// Async client for the video platform's data API
#[derive(Clone)]
pub struct VideoApiClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl VideoApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PipelineError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the first page of the most-popular chart
    ///
    /// Returns the decoded response document untouched. No pagination and
    /// no retry: a failure is reported to the caller immediately.
    pub async fn fetch_most_popular(&self, query: &TrendingQuery<'_>) -> Result<Value> {
        let endpoint = self.videos_url();
        let region = query.region_code;
        let max_results = query.max_results;
        debug!(
            "Requesting {endpoint} (regionCode={region}, maxResults={max_results})",
            endpoint: endpoint.as_str(),
            region,
            max_results
        );

        // reqwest errors carry the full URL, which includes the API key
        let response = self
            .http_client
            .get(&endpoint)
            .query(&Self::query_pairs(query))
            .send()
            .await
            .map_err(|e| PipelineError::Http(e.without_url()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| PipelineError::Http(e.without_url()))?;

        if !status.is_success() {
            return Err(PipelineError::UpstreamStatus {
                status: status.as_u16(),
                message: truncate(&text, ERROR_BODY_LIMIT),
            });
        }

        serde_json::from_str(&text).map_err(PipelineError::UpstreamBody)
    }

    fn videos_url(&self) -> String {
        format!("{}/videos", self.base_url)
    }

    fn query_pairs(query: &TrendingQuery<'_>) -> Vec<(&'static str, String)> {
        vec![
            ("part", PARTS.to_string()),
            ("chart", CHART.to_string()),
            ("maxResults", query.max_results.to_string()),
            ("regionCode", query.region_code.to_string()),
            ("key", query.api_key.to_string()),
        ]
    }
}

fn truncate(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
