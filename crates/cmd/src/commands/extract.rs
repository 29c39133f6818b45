// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use trending::{PipelineConfig, extract};

use crate::common::{StorageArgs, base_config, print_response};

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// API key for the videos endpoint
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// ISO 3166-1 alpha-2 region of the chart
    #[arg(long)]
    pub region_code: Option<String>,

    /// Page size, clamped to 1..=50
    #[arg(long)]
    pub max_results: Option<u32>,

    /// Base URL of the API, e.g. for a local mock
    #[arg(long)]
    pub api_base_url: Option<String>,

    /// Also point manifests/raw_latest.json at the new object
    #[arg(long)]
    pub publish_manifest: bool,

    /// Do not write the manifest, even if the configuration file asks for it
    #[arg(long, conflicts_with = "publish_manifest")]
    pub no_publish_manifest: bool,

    #[command(flatten)]
    pub storage: StorageArgs,
}

impl ExtractArgs {
    pub fn apply(&self, config: &mut PipelineConfig) -> Result<()> {
        if let Some(key) = &self.api_key {
            config.api_key.clone_from(key);
        }
        if let Some(region) = &self.region_code {
            config.region_code.clone_from(region);
        }
        if let Some(max) = self.max_results {
            config.max_results = max;
        }
        if let Some(url) = &self.api_base_url {
            config.api_base_url.clone_from(url);
        }
        if self.publish_manifest {
            config.publish_manifest = true;
        }
        if self.no_publish_manifest {
            config.publish_manifest = false;
        }
        self.storage.apply(config)
    }
}

pub async fn extract_command(config_path: Option<&Path>, args: &ExtractArgs) -> Result<ExitCode> {
    let mut config = base_config(config_path)?;
    args.apply(&mut config)?;

    let response = extract::handle(&config).await;
    print_response(&response)
}
