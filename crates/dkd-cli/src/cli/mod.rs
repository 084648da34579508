//! CLI for the diagnosis key downloader.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use dkd_core::config;
use std::path::PathBuf;

use commands::{run_clean, run_cursors, run_download, run_reset_cursor, run_roaming};

/// Top-level CLI for dkd.
#[derive(Debug, Parser)]
#[command(name = "dkd")]
#[command(about = "dkd: diagnosis key discovery and download", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Run one download cycle: home server plus roaming servers of visited regions.
    Download {
        /// Region visited recently (ISO-3166 alpha-2). Repeatable; replaces `visited_regions` from config.
        #[arg(long = "region", value_name = "CC")]
        regions: Vec<String>,
        /// Deadline for the whole cycle in seconds (overrides `download_timeout_secs`).
        #[arg(long, value_name = "N")]
        timeout_secs: Option<u64>,
    },

    /// List stored download cursors.
    Cursors,

    /// Forget cursors so the next cycle downloads the full index again.
    ResetCursor {
        /// Index URL of the server whose cursor to forget.
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        index_url: Option<String>,
        /// Forget every cursor.
        #[arg(long)]
        all: bool,
    },

    /// Parse a roaming config and print the region -> servers map.
    Roaming {
        /// JSON file (defaults to `roaming_config` from config).
        path: Option<PathBuf>,
    },

    /// Delete key batch directories older than the given age.
    Clean {
        /// Minimum age in hours of a batch to delete.
        #[arg(long, default_value = "24", value_name = "N")]
        older_than_hours: u64,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Download {
                regions,
                timeout_secs,
            } => run_download(&cfg, regions, timeout_secs).await?,
            CliCommand::Cursors => run_cursors().await?,
            CliCommand::ResetCursor { index_url, all } => {
                run_reset_cursor(index_url.as_deref(), all).await?
            }
            CliCommand::Roaming { path } => run_roaming(&cfg, path.as_deref())?,
            CliCommand::Clean { older_than_hours } => run_clean(&cfg, older_than_hours).await?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
