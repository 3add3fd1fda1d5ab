// Palma2Tacton
// Copyright (C) 2025 Synerthink

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;

use crate::commands::CommandContext;
use crate::commands::convert::ConvertOptions;
use crate::config::CliConfig;
use anyhow::Result;
use tracing::Level;

/// Convert Palma product configuration exports into Tacton models
#[derive(Parser, Debug)]
#[command(name = "palma2tacton", about = "Palma to Tacton model conversion")]
pub struct Cli {
    /// Path to configuration file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log per-stage and per-assembly details
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Map a Palma export and write the Tacton model
    Convert {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        /// Keep technical attributes nothing refers to
        #[arg(long)]
        no_optimize: bool,
        /// Write single-line JSON
        #[arg(long)]
        compact: bool,
    },

    /// Report aggregate entries that point at nothing
    Check {
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Show the import requests an upload would send
    Plan {
        #[arg(short, long)]
        input: PathBuf,
        /// Write each request body to its own file in this directory
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt().with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO }).with_writer(std::io::stderr).init();

    let config = CliConfig::resolve_config(cli.config)?;
    let ctx = CommandContext::new(config);

    match cli.command {
        Commands::Convert { input, output, no_optimize, compact } => {
            commands::convert::convert(
                &ctx,
                ConvertOptions {
                    input: &input,
                    output: &output,
                    no_optimize,
                    compact,
                },
            )?;
        }
        Commands::Check { input } => {
            commands::check::check(&ctx, &input)?;
        }
        Commands::Plan { input, output_dir } => {
            commands::plan::plan(&ctx, &input, output_dir.as_deref()).await?;
        }
    }

    Ok(())
}
