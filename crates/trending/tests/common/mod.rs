// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Shared fixtures for the stage tests

#![allow(dead_code)]

use futures::TryStreamExt;
use object_store::path::Path;
use serde_json::Value;
use std::time::Duration;
use trending::{PipelineConfig, Storage, StorageConfig, VideoApiClient};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const API_KEY: &str = "test-key";
pub const BUCKET: &str = "trend-bucket";
pub const API_PATH: &str = "/youtube/v3/videos";

/// Raw response body of the most-popular fixture
pub fn fixture_text() -> String {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/test_data/most_popular.json");
    std::fs::read_to_string(&path).expect("fixture readable")
}

pub fn fixture_json() -> Value {
    serde_json::from_str(&fixture_text()).expect("fixture is json")
}

pub fn base_url(server: &MockServer) -> String {
    format!("{}/youtube/v3", server.uri())
}

/// Configuration pointing at the mock server and in-memory storage
pub fn test_config(server: &MockServer) -> PipelineConfig {
    PipelineConfig {
        api_key: API_KEY.to_string(),
        bucket: BUCKET.to_string(),
        api_base_url: base_url(server),
        request_timeout_secs: 5,
        storage: StorageConfig::Memory,
        ..PipelineConfig::default()
    }
}

/// Configuration for transform-only tests (no API involved)
pub fn transform_config() -> PipelineConfig {
    PipelineConfig {
        bucket: BUCKET.to_string(),
        storage: StorageConfig::Memory,
        ..PipelineConfig::default()
    }
}

pub fn test_client(config: &PipelineConfig) -> VideoApiClient {
    VideoApiClient::new(&config.api_base_url, Duration::from_secs(5))
        .expect("client construction should not fail")
}

/// Mount the fixture as the response to any videos listing
pub async fn mount_fixture(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(fixture_text()))
        .mount(server)
        .await;
}

/// Every key in the bucket, sorted
pub async fn all_keys(storage: &Storage) -> Vec<String> {
    let mut keys: Vec<String> = storage
        .store()
        .list(None)
        .map_ok(|meta| meta.location.to_string())
        .try_collect()
        .await
        .expect("listing succeeds");
    keys.sort();
    keys
}

pub async fn keys_under(storage: &Storage, prefix: &str) -> Vec<String> {
    all_keys(storage)
        .await
        .into_iter()
        .filter(|k| k.starts_with(prefix))
        .collect()
}

pub async fn content_type(storage: &Storage, key: &str) -> Option<String> {
    storage
        .store()
        .get(&Path::from(key))
        .await
        .expect("object exists")
        .attributes
        .get(&object_store::Attribute::ContentType)
        .map(|v| v.to_string())
}

/// Store a raw snapshot, then wait so the next write gets a later timestamp
pub async fn put_raw(storage: &Storage, key: &str, body: &Value) {
    storage
        .put(key, body.to_string(), "application/json")
        .await
        .expect("raw write succeeds");
    tokio::time::sleep(Duration::from_millis(20)).await;
}
