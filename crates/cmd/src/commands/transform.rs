// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, ValueEnum};
use trending::{PipelineConfig, Selection, transform};

use crate::common::{StorageArgs, base_config, print_response};

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionArg {
    /// Newest object under raw_data/
    Latest,
    /// Object named by manifests/raw_latest.json
    Manifest,
}

impl From<SelectionArg> for Selection {
    fn from(arg: SelectionArg) -> Self {
        match arg {
            SelectionArg::Latest => Selection::Latest,
            SelectionArg::Manifest => Selection::Manifest,
        }
    }
}

#[derive(Args, Debug)]
pub struct TransformArgs {
    /// How to pick the raw object to process
    #[arg(long, value_enum)]
    pub selection: Option<SelectionArg>,

    #[command(flatten)]
    pub storage: StorageArgs,
}

impl TransformArgs {
    pub fn apply(&self, config: &mut PipelineConfig) -> Result<()> {
        if let Some(selection) = self.selection {
            config.selection = selection.into();
        }
        self.storage.apply(config)
    }
}

pub async fn transform_command(config_path: Option<&Path>, args: &TransformArgs) -> Result<ExitCode> {
    let mut config = base_config(config_path)?;
    args.apply(&mut config)?;

    let response = transform::handle(&config).await;
    print_response(&response)
}
