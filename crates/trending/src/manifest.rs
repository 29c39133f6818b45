// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Pointer to the newest raw snapshot
//!
//! When enabled, extract writes the manifest after the raw object, so a
//! reader that follows it never sees a key whose object is not yet
//! complete. Listing-based selection has no such guarantee.

use crate::keys::{CONTENT_TYPE_JSON, MANIFEST_KEY};
use crate::{PipelineError, Result, Storage};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LatestManifest {
    /// Raw object key, e.g. `raw_data/youtube_trending_...json`
    pub key: String,
    /// RFC 3339 time the raw object was written
    pub written_at: String,
}

impl LatestManifest {
    #[must_use]
    pub fn new(key: &str, written_at: DateTime<Utc>) -> Self {
        Self {
            key: key.to_string(),
            written_at: written_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }

    pub async fn publish(&self, storage: &Storage) -> Result<()> {
        let body = serde_json::to_vec_pretty(self)?;
        storage.put(MANIFEST_KEY, body, CONTENT_TYPE_JSON).await
    }

    /// Read the manifest; a missing manifest is an empty source
    pub async fn read(storage: &Storage) -> Result<Self> {
        let data = match storage.get(MANIFEST_KEY).await {
            Ok(data) => data,
            Err(PipelineError::ObjectStore(object_store::Error::NotFound { .. })) => {
                return Err(PipelineError::ManifestMissing {
                    key: MANIFEST_KEY.to_string(),
                });
            }
            Err(e) => return Err(e),
        };

        serde_json::from_slice(&data).map_err(|e| PipelineError::MalformedSnapshot {
            key: MANIFEST_KEY.to_string(),
            reason: e.to_string(),
        })
    }
}
