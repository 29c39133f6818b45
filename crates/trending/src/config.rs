// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Pipeline configuration
//!
//! Built once at process start (YAML file, then flags and environment) and
//! passed to each stage explicitly.

use crate::client::{DEFAULT_BASE_URL, MAX_PAGE_SIZE};
use crate::keys::DEFAULT_SOURCE_NAME;
use crate::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const API_KEY_ENV: &str = "API_KEY";
pub const BUCKET_ENV: &str = "STORAGE_BUCKET_NAME";

/// How the transform stage finds its input
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Selection {
    /// List `raw_data/` and take the newest object by last-modified time
    #[default]
    Latest,
    /// Read the key named by `manifests/raw_latest.json`
    Manifest,
}

/// Object store backend
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StorageConfig {
    /// Amazon S3 or an S3-compatible service. Credentials come from the
    /// standard AWS environment variables.
    S3 {
        #[serde(default)]
        region: Option<String>,
        #[serde(default)]
        endpoint: Option<String>,
        #[serde(default)]
        allow_http: bool,
    },
    /// A directory per bucket under `root`
    Local { root: PathBuf },
    /// Process-local store, useful for dry runs
    Memory,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::S3 {
            region: None,
            endpoint: None,
            allow_http: false,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    pub api_key: String,
    pub bucket: String,
    pub region_code: String,
    pub max_results: u32,
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    /// Prefix of every object name, e.g. `youtube_trending`
    pub source_name: String,
    /// Extract also writes `manifests/raw_latest.json` after the raw object
    pub publish_manifest: bool,
    pub selection: Selection,
    pub storage: StorageConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            bucket: String::new(),
            region_code: "US".to_string(),
            max_results: MAX_PAGE_SIZE,
            api_base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 60,
            source_name: DEFAULT_SOURCE_NAME.to_string(),
            publish_manifest: false,
            selection: Selection::Latest,
            storage: StorageConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Check everything the extract stage needs before any I/O happens
    pub fn validate_extract(&self) -> Result<()> {
        let mut missing = Vec::new();
        if self.api_key.trim().is_empty() {
            missing.push(API_KEY_ENV);
        }
        if self.bucket.trim().is_empty() {
            missing.push(BUCKET_ENV);
        }
        if !missing.is_empty() {
            return Err(PipelineError::MissingConfiguration(missing));
        }

        url::Url::parse(&self.api_base_url).map_err(|e| {
            PipelineError::Config(format!("api_base_url {:?}: {e}", self.api_base_url))
        })?;

        if self.region_code.len() != 2 || !self.region_code.chars().all(|c| c.is_ascii_alphabetic())
        {
            return Err(PipelineError::Config(format!(
                "region_code must be a two-letter country code, got {:?}",
                self.region_code
            )));
        }

        self.validate_common()
    }

    /// Check everything the transform stage needs before any I/O happens
    pub fn validate_transform(&self) -> Result<()> {
        if self.bucket.trim().is_empty() {
            return Err(PipelineError::MissingConfiguration(vec![BUCKET_ENV]));
        }
        self.validate_common()
    }

    fn validate_common(&self) -> Result<()> {
        if self.source_name.is_empty() || self.source_name.contains('/') {
            return Err(PipelineError::Config(format!(
                "source_name must be non-empty and contain no '/', got {:?}",
                self.source_name
            )));
        }
        Ok(())
    }

    /// Page size actually requested; the endpoint caps it at 50
    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.max_results.clamp(1, MAX_PAGE_SIZE)
    }

    /// Bucket name with surrounding whitespace removed
    #[must_use]
    pub fn bucket_name(&self) -> &str {
        self.bucket.trim()
    }
}

/// Load configuration from a YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<PipelineConfig> {
    let content = std::fs::read_to_string(&path).map_err(|e| {
        PipelineError::Config(format!(
            "Failed to read config file {}: {e}",
            path.as_ref().display()
        ))
    })?;

    serde_yaml_ng::from_str(&content).map_err(|e| {
        PipelineError::Config(format!(
            "Failed to parse YAML configuration {}: {e}",
            path.as_ref().display()
        ))
    })
}

/// Commented example written by `trendpipe init`
#[must_use]
pub fn example_config_yaml() -> String {
    format!(
        r#"# trendpipe configuration
#
# api_key and bucket may be left empty here and supplied through the
# {API_KEY_ENV} and {BUCKET_ENV} environment variables instead.
api_key: ""
bucket: ""
region_code: US
max_results: {MAX_PAGE_SIZE}
api_base_url: {DEFAULT_BASE_URL}
request_timeout_secs: 60
source_name: {DEFAULT_SOURCE_NAME}
publish_manifest: false
selection: latest   # or: manifest
storage:
  type: s3          # or: local (with root: /path), memory
  region: us-east-1
"#
    )
}
