// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Args, ValueEnum};
use diagnostics::*;
use trending::{PipelineConfig, StageResponse, StorageConfig, load_config};

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    S3,
    Local,
    Memory,
}

impl StorageKind {
    fn of(config: &StorageConfig) -> Self {
        match config {
            StorageConfig::S3 { .. } => StorageKind::S3,
            StorageConfig::Local { .. } => StorageKind::Local,
            StorageConfig::Memory => StorageKind::Memory,
        }
    }
}

/// Where both stages read and write objects
#[derive(Args, Debug, Default, Clone)]
pub struct StorageArgs {
    /// Bucket holding raw_data/ and processed_data/
    #[arg(long, env = "STORAGE_BUCKET_NAME")]
    pub bucket: Option<String>,

    /// Object store backend
    #[arg(long, value_enum)]
    pub storage: Option<StorageKind>,

    /// Directory holding one subdirectory per bucket (local storage)
    #[arg(long)]
    pub storage_root: Option<PathBuf>,

    /// S3 region
    #[arg(long)]
    pub region: Option<String>,

    /// S3-compatible endpoint URL
    #[arg(long)]
    pub endpoint: Option<String>,
}

impl StorageArgs {
    /// Override the storage part of `config` with whatever was given
    pub fn apply(&self, config: &mut PipelineConfig) -> Result<()> {
        if let Some(bucket) = &self.bucket {
            config.bucket.clone_from(bucket);
        }

        if let Some(kind) = self.storage.filter(|k| *k != StorageKind::of(&config.storage)) {
            config.storage = match kind {
                StorageKind::S3 => StorageConfig::default(),
                StorageKind::Local => StorageConfig::Local {
                    root: self
                        .storage_root
                        .clone()
                        .context("--storage local requires --storage-root")?,
                },
                StorageKind::Memory => StorageConfig::Memory,
            };
        }

        match &mut config.storage {
            StorageConfig::S3 {
                region, endpoint, ..
            } => {
                if self.region.is_some() {
                    region.clone_from(&self.region);
                }
                if self.endpoint.is_some() {
                    endpoint.clone_from(&self.endpoint);
                }
            }
            StorageConfig::Local { root } => {
                if let Some(dir) = &self.storage_root {
                    root.clone_from(dir);
                }
            }
            StorageConfig::Memory => {}
        }
        Ok(())
    }
}

/// Configuration from the file, if any, otherwise the defaults
pub fn base_config(path: Option<&Path>) -> Result<PipelineConfig> {
    let Some(path) = path else {
        return Ok(PipelineConfig::default());
    };

    if !path.exists() {
        bail!(
            "Configuration file not found: {}. Run `trendpipe init {}` to create one",
            path.display(),
            path.display()
        );
    }

    let display = path.display().to_string();
    debug!("Loading configuration from {display}", display: display.as_str());
    load_config(path).with_context(|| format!("Failed to load configuration from {display}"))
}

/// Print the stage response and map it to the process exit code
pub fn print_response(response: &StageResponse) -> Result<ExitCode> {
    let line = serde_json::to_string(response)?;
    writeln!(std::io::stdout().lock(), "{line}")?;

    Ok(if response.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Report a failure that happened outside any stage
pub fn report_failure(out: &mut impl Write, err: &anyhow::Error) -> ExitCode {
    // stderr may already be closed
    let _ = writeln!(out, "Error: {err:#}");
    ExitCode::FAILURE
}
