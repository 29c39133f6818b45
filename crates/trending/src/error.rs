// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Error types shared by both pipeline stages

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Missing required configuration: {}", .0.join(", "))]
    MissingConfiguration(Vec<&'static str>),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Upstream request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream returned HTTP {status}: {message}")]
    UpstreamStatus { status: u16, message: String },

    #[error("Upstream response is not valid JSON: {0}")]
    UpstreamBody(#[source] serde_json::Error),

    #[error("No files found in {prefix}")]
    NoRawObjects { prefix: String },

    #[error("Manifest {key} not found")]
    ManifestMissing { key: String },

    #[error("Raw object {key} not found")]
    RawObjectMissing { key: String },

    #[error("No items found in JSON ({key})")]
    NoItems { key: String },

    #[error("Malformed snapshot {key}: {reason}")]
    MalformedSnapshot { key: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow conversion error: {0}")]
    SerdeArrow(#[from] serde_arrow::Error),

    #[error("Object store error: {0}")]
    ObjectStore(#[from] object_store::Error),
}

impl PipelineError {
    /// Snake-case kind reported in error response bodies
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::MissingConfiguration(_) => "missing_configuration",
            PipelineError::Config(_) => "invalid_configuration",
            PipelineError::Http(_)
            | PipelineError::UpstreamStatus { .. }
            | PipelineError::UpstreamBody(_) => "upstream_failure",
            PipelineError::NoRawObjects { .. }
            | PipelineError::ManifestMissing { .. }
            | PipelineError::RawObjectMissing { .. }
            | PipelineError::NoItems { .. } => "empty_source",
            PipelineError::MalformedSnapshot { .. } => "malformed_snapshot",
            PipelineError::Serialization(_)
            | PipelineError::Arrow(_)
            | PipelineError::Parquet(_)
            | PipelineError::SerdeArrow(_) => "encode_failure",
            PipelineError::ObjectStore(_) => "storage_failure",
        }
    }

    /// HTTP-style status code for the stage response
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            PipelineError::MissingConfiguration(_)
            | PipelineError::Config(_)
            | PipelineError::NoItems { .. } => 400,
            PipelineError::NoRawObjects { .. }
            | PipelineError::ManifestMissing { .. }
            | PipelineError::RawObjectMissing { .. } => 404,
            _ => 500,
        }
    }
}
