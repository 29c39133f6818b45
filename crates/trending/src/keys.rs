// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Object key layout
//!
//! ```text
//! raw_data/<source>_<YYYY-MM-DDTHH-MM-SSZ>.json
//! processed_data/<source>_<YYYY-MM-DDTHH-MM-SSZ>.parquet
//! manifests/raw_latest.json
//! ```

use chrono::{DateTime, Utc};

pub const RAW_PREFIX: &str = "raw_data/";
pub const PROCESSED_PREFIX: &str = "processed_data/";
pub const MANIFEST_KEY: &str = "manifests/raw_latest.json";

pub const DEFAULT_SOURCE_NAME: &str = "youtube_trending";

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_PARQUET: &str = "application/octet-stream";

/// UTC timestamp at second precision, colon-free so it is safe in keys
#[must_use]
pub fn key_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H-%M-%SZ").to_string()
}

#[must_use]
pub fn raw_key(source: &str, at: DateTime<Utc>) -> String {
    format!("{RAW_PREFIX}{source}_{}.json", key_timestamp(at))
}

#[must_use]
pub fn processed_key(source: &str, at: DateTime<Utc>) -> String {
    format!("{PROCESSED_PREFIX}{source}_{}.parquet", key_timestamp(at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_key_construction() {
        let at = Utc
            .with_ymd_and_hms(2025, 3, 7, 4, 5, 9)
            .single()
            .expect("valid date");

        assert_eq!(key_timestamp(at), "2025-03-07T04-05-09Z");
        assert_eq!(
            raw_key(DEFAULT_SOURCE_NAME, at),
            "raw_data/youtube_trending_2025-03-07T04-05-09Z.json"
        );
        assert_eq!(
            processed_key(DEFAULT_SOURCE_NAME, at),
            "processed_data/youtube_trending_2025-03-07T04-05-09Z.parquet"
        );
    }

    #[test]
    fn test_subsecond_precision_is_dropped() {
        let at = Utc
            .timestamp_opt(1_700_000_000, 999_000_000)
            .single()
            .expect("valid timestamp");
        assert_eq!(key_timestamp(at), "2023-11-14T22-13-20Z");
    }
}
