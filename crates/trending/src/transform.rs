// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Transform stage: newest raw snapshot to one Parquet object
//!
//! Steps, in order: discover and select the input, load and parse it,
//! flatten items into [`FlatRecord`](crate::FlatRecord)s with counts
//! coerced, encode as Parquet in memory, write under `processed_data/`.
//! Every failure is returned as a structured response; nothing is
//! written unless all earlier steps succeeded.

use crate::config::Selection;
use crate::keys::{self, CONTENT_TYPE_PARQUET, RAW_PREFIX};
use crate::records::{RawSnapshot, flatten_items};
use crate::{LatestManifest, PipelineConfig, PipelineError, Result, StageResponse, Storage, encode_records};
use chrono::Utc;
use diagnostics::*;
use serde_json::json;

pub const SUCCESS_MESSAGE: &str = "Transformation complete - data saved as Parquet";

/// What a successful transformation read and wrote
#[derive(Debug, Clone)]
pub struct TransformOutcome {
    pub source_key: String,
    pub key: String,
    pub uri: String,
    pub record_count: usize,
}

/// Run the stage from configuration alone
pub async fn handle(config: &PipelineConfig) -> StageResponse {
    if let Err(e) = config.validate_transform() {
        return failure(&e);
    }

    match Storage::open(&config.storage, config.bucket_name()).await {
        Ok(storage) => run(config, &storage).await,
        Err(e) => failure(&e),
    }
}

/// Run the stage against the given storage
pub async fn run(config: &PipelineConfig, storage: &Storage) -> StageResponse {
    match transform(config, storage).await {
        Ok(outcome) => StageResponse::ok(&json!({
            "message": SUCCESS_MESSAGE,
            "output": outcome.uri,
            "source": outcome.source_key,
            "records": outcome.record_count,
        })),
        Err(e) => failure(&e),
    }
}

pub async fn transform(config: &PipelineConfig, storage: &Storage) -> Result<TransformOutcome> {
    config.validate_transform()?;

    let source_key = select_source(config.selection, storage).await?;
    info!("Processing file: {source_key}", source_key: source_key.as_str());

    let data = match storage.get(&source_key).await {
        Ok(data) => data,
        // Removed between selection and read, or a stale manifest
        Err(PipelineError::ObjectStore(object_store::Error::NotFound { .. })) => {
            return Err(PipelineError::RawObjectMissing { key: source_key });
        }
        Err(e) => return Err(e),
    };
    let items = RawSnapshot::parse(&source_key, &data)?.into_items(&source_key)?;

    let records = flatten_items(&items);
    let record_count = records.len();
    let encoded = encode_records(&records)?;
    let size = encoded.len();
    debug!("Encoded {record_count} records into {size} bytes of Parquet", record_count, size);

    let key = keys::processed_key(&config.source_name, Utc::now());
    storage.put(&key, encoded, CONTENT_TYPE_PARQUET).await?;

    let uri = storage.uri(&key);
    info!("Wrote {record_count} records to {uri}", record_count, uri: uri.as_str());

    Ok(TransformOutcome {
        source_key,
        key,
        uri,
        record_count,
    })
}

/// Key of the raw object to process
pub async fn select_source(selection: Selection, storage: &Storage) -> Result<String> {
    match selection {
        Selection::Latest => {
            let latest = storage
                .latest(RAW_PREFIX)
                .await?
                .ok_or_else(|| PipelineError::NoRawObjects {
                    prefix: RAW_PREFIX.to_string(),
                })?;
            Ok(latest.location.to_string())
        }
        Selection::Manifest => Ok(LatestManifest::read(storage).await?.key),
    }
}

fn failure(err: &PipelineError) -> StageResponse {
    let kind = err.kind();
    warn!("Transform failed ({kind}): {reason}", kind, reason: err.to_string());
    StageResponse::from_error(err)
}
