// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use arrow::util::pretty::pretty_format_batches;
use clap::Args;
use diagnostics::*;
use trending::keys::PROCESSED_PREFIX;
use trending::processed::read_batches;
use trending::Storage;

use crate::common::{StorageArgs, base_config};

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Processed object key; defaults to the newest under processed_data/
    pub key: Option<String>,

    #[command(flatten)]
    pub storage: StorageArgs,
}

pub async fn inspect_command(config_path: Option<&Path>, args: &InspectArgs) -> Result<ExitCode> {
    let mut config = base_config(config_path)?;
    args.storage.apply(&mut config)?;
    config.validate_transform()?;

    let storage = Storage::open(&config.storage, config.bucket_name()).await?;
    let table = render_table(&storage, args.key.as_deref()).await?;
    writeln!(std::io::stdout().lock(), "{table}")?;
    Ok(ExitCode::SUCCESS)
}

/// Pretty-printed contents of a processed object
pub async fn render_table(storage: &Storage, key: Option<&str>) -> Result<String> {
    let key = match key {
        Some(key) => key.to_string(),
        None => storage
            .latest(PROCESSED_PREFIX)
            .await?
            .map(|meta| meta.location.to_string())
            .with_context(|| format!("No files found in {PROCESSED_PREFIX}"))?,
    };

    let data = storage
        .get(&key)
        .await
        .with_context(|| format!("Failed to read {key}"))?;
    let batches = read_batches(data).with_context(|| format!("{key} is not a processed table"))?;

    let rows: usize = batches.iter().map(|b| b.num_rows()).sum();
    info!("Read {rows} rows from {key}", rows, key: key.as_str());

    Ok(pretty_format_batches(&batches)?.to_string())
}
