// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Extract stage: one API call, one raw object

use crate::client::{TrendingQuery, VideoApiClient};
use crate::keys::{self, CONTENT_TYPE_JSON};
use crate::{LatestManifest, PipelineConfig, Result, StageResponse, Storage};
use chrono::Utc;
use diagnostics::*;
use serde_json::json;
use std::time::Duration;

pub const SUCCESS_MESSAGE: &str = "YouTube trending data extracted successfully";

/// What a successful extraction wrote
#[derive(Debug, Clone)]
pub struct ExtractOutcome {
    pub key: String,
    pub uri: String,
    pub item_count: usize,
}

/// Run the stage from configuration alone
///
/// Storage and the HTTP client are only built once the configuration has
/// been validated, so a missing value never causes I/O.
pub async fn handle(config: &PipelineConfig) -> StageResponse {
    if let Err(e) = config.validate_extract() {
        return failure(&e);
    }

    let storage = match Storage::open(&config.storage, config.bucket_name()).await {
        Ok(storage) => storage,
        Err(e) => return failure(&e),
    };
    let timeout = Duration::from_secs(config.request_timeout_secs);
    match VideoApiClient::new(&config.api_base_url, timeout) {
        Ok(client) => run(config, &storage, &client).await,
        Err(e) => failure(&e),
    }
}

/// Run the stage against the given storage and client
pub async fn run(
    config: &PipelineConfig,
    storage: &Storage,
    client: &VideoApiClient,
) -> StageResponse {
    match extract(config, storage, client).await {
        Ok(outcome) => StageResponse::ok(&json!({
            "message": SUCCESS_MESSAGE,
            "s3_path": outcome.uri,
        })),
        Err(e) => failure(&e),
    }
}

/// Fetch the chart and store it under `raw_data/`
pub async fn extract(
    config: &PipelineConfig,
    storage: &Storage,
    client: &VideoApiClient,
) -> Result<ExtractOutcome> {
    config.validate_extract()?;

    let query = TrendingQuery {
        api_key: config.api_key.trim(),
        region_code: &config.region_code,
        max_results: config.page_size(),
    };
    let snapshot = client.fetch_most_popular(&query).await?;

    let item_count = snapshot
        .get("items")
        .and_then(|items| items.as_array())
        .map_or(0, Vec::len);
    let body = serde_json::to_string_pretty(&snapshot)?;

    let written_at = Utc::now();
    let key = keys::raw_key(&config.source_name, written_at);
    storage.put(&key, body, CONTENT_TYPE_JSON).await?;

    let uri = storage.uri(&key);
    info!("Wrote raw snapshot with {item_count} items to {uri}", item_count, uri: uri.as_str());

    if config.publish_manifest {
        LatestManifest::new(&key, written_at).publish(storage).await?;
        debug!("Published manifest for {key}", key: key.as_str());
    }

    Ok(ExtractOutcome {
        key,
        uri,
        item_count,
    })
}

fn failure(err: &crate::PipelineError) -> StageResponse {
    let kind = err.kind();
    warn!("Extract failed ({kind}): {reason}", kind, reason: err.to_string());
    StageResponse::from_error(err)
}
