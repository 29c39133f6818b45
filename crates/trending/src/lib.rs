// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Two-stage pipeline for trending-video snapshots
//!
//! The **extract** stage calls the video platform's "most popular" listing
//! once and stores the decoded response under `raw_data/`. The **transform**
//! stage picks the newest raw snapshot, flattens every item into a
//! [`FlatRecord`], and stores the table as Parquet under `processed_data/`.
//!
//! The stages never call each other. They share nothing but the object
//! store, so each can be scheduled on its own.
//!
//! # Usage
//!
//! ```no_run
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use trending::{PipelineConfig, extract, transform};
//!
//! let config = PipelineConfig {
//!     api_key: "my-key".to_string(),
//!     bucket: "my-bucket".to_string(),
//!     ..PipelineConfig::default()
//! };
//!
//! let response = extract::handle(&config).await;
//! assert_eq!(response.status_code, 200);
//!
//! let response = transform::handle(&config).await;
//! println!("{}", response.body);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
mod error;
pub mod extract;
pub mod keys;
pub mod manifest;
pub mod processed;
pub mod records;
mod response;
pub mod storage;
pub mod transform;

pub use client::{TrendingQuery, VideoApiClient};
pub use config::{PipelineConfig, Selection, StorageConfig, load_config};
pub use error::PipelineError;
pub use manifest::LatestManifest;
pub use processed::{ForArrow, decode_records, encode_records};
pub use records::{FlatRecord, RawItem, RawSnapshot, coerce_count, flatten_items};
pub use response::StageResponse;
pub use storage::Storage;

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;
