use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::CompareMode;

#[derive(Parser, Debug)]
#[command(
    name = "sld",
    about = "Storage Layout Diff: catch unsafe storage changes before upgrading contracts",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Configuration file (defaults to ./sld.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Snapshot the current build and save it
    Save(SaveArgs),
    /// Compare the current build against a saved snapshot
    Compare(CompareArgs),
    /// Show which contracts inherit from which
    Impact(ImpactArgs),
}

#[derive(Args, Debug, Default)]
pub struct SaveArgs {
    /// Snapshot file name
    #[arg(long)]
    pub file: Option<String>,
    /// Directory holding build-info JSON files
    #[arg(long)]
    pub build_info: Option<PathBuf>,
    /// Directory snapshots are saved to
    #[arg(long)]
    pub snapshot_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub struct CompareArgs {
    /// Snapshot file name
    #[arg(long)]
    pub file: Option<String>,
    /// When to fail: strict, soft or none
    #[arg(long)]
    pub mode: Option<CompareMode>,
    /// Skip the per-contract report
    #[arg(long)]
    pub no_print_diff: bool,
    /// Directory holding build-info JSON files
    #[arg(long)]
    pub build_info: Option<PathBuf>,
    /// Directory the saved snapshot is read from
    #[arg(long)]
    pub snapshot_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub struct ImpactArgs {
    /// Directory holding build-info JSON files
    #[arg(long)]
    pub build_info: Option<PathBuf>,
}
