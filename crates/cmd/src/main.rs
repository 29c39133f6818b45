// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

mod commands;
mod common;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use diagnostics::*;

use commands::{ExtractArgs, InspectArgs, TransformArgs};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "trendpipe")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// YAML configuration file; flags and environment variables override it
    #[arg(short, long, global = true, env = "TRENDPIPE_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch the most-popular chart and store it under raw_data/
    Extract(ExtractArgs),
    /// Convert the newest raw snapshot into a Parquet table under processed_data/
    Transform(TransformArgs),
    /// Print a processed table
    Inspect(InspectArgs),
    /// Write an example configuration file
    Init {
        /// Where to write the file
        #[arg(default_value = "trendpipe.yaml")]
        path: PathBuf,
    },
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = cli.config.as_deref();
    match &cli.command {
        Commands::Extract(args) => commands::extract_command(config, args).await,
        Commands::Transform(args) => commands::transform_command(config, args).await,
        Commands::Inspect(args) => commands::inspect_command(config, args).await,
        Commands::Init { path } => commands::init_command(path).map(|()| ExitCode::SUCCESS),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_diagnostics();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => common::report_failure(&mut std::io::stderr().lock(), &e),
    }
}
