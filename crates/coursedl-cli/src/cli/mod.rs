//! CLI for the coursedl batch downloader.

mod commands;
mod prompt;

use anyhow::Result;
use clap::{Parser, Subcommand};
use coursedl_core::config;
use std::path::PathBuf;

use commands::{run_download, run_verify};

/// Top-level CLI. With no subcommand the user is asked which operation to run.
#[derive(Debug, Parser)]
#[command(name = "coursedl")]
#[command(about = "coursedl: batch course video downloader with missing-lesson reconciliation", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download every job list in a directory into per-module folders.
    Download {
        /// Directory holding the spreadsheet job lists.
        #[arg(long, value_name = "DIR")]
        lists: Option<PathBuf>,
        /// Base directory for module folders (also holds config.toml).
        #[arg(long, value_name = "DIR")]
        output: Option<PathBuf>,
        /// Job lists to run: 1-based numbers separated by spaces, or `all`.
        #[arg(long, value_name = "LIST")]
        select: Option<String>,
    },

    /// Retry the missing lessons recorded under a download root.
    Verify {
        /// Root directory to scan for missing-lesson ledgers.
        #[arg(long, value_name = "DIR")]
        root: Option<PathBuf>,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let command = match cli.command {
            Some(command) => command,
            None => prompt::operation()?,
        };
        command.execute().await
    }

    async fn execute(self) -> Result<()> {
        match self {
            CliCommand::Download {
                lists,
                output,
                select,
            } => {
                let lists = match lists {
                    Some(dir) => dir,
                    None => prompt::directory("Directory holding the job list spreadsheets")?,
                };
                let output = match output {
                    Some(dir) => dir,
                    None => prompt::directory("Directory where downloads will be saved")?,
                };
                let cfg = config::load_or_init(&output)?;
                tracing::debug!("loaded config: {:?}", cfg);
                run_download(&cfg, &lists, &output, select.as_deref()).await?;
            }
            CliCommand::Verify { root } => {
                let root = match root {
                    Some(dir) => dir,
                    None => prompt::directory("Directory holding the modules to verify")?,
                };
                let cfg = config::load_or_init(&root)?;
                tracing::debug!("loaded config: {:?}", cfg);
                run_verify(&cfg, &root).await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
