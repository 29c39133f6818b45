// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use anyhow::{Context, Result, bail};
use diagnostics::*;
use trending::config::example_config_yaml;

pub fn init_command(path: &Path) -> Result<()> {
    let display = path.display().to_string();

    if path.exists() {
        bail!("Configuration file already exists: {display}. Delete it first to create a new one");
    }

    std::fs::write(path, example_config_yaml())
        .with_context(|| format!("Failed to create configuration file: {display}"))?;

    info!("Created example configuration file: {display}", display: display.as_str());
    Ok(())
}
