//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    annotate::AnnotateArgs,
    cache::CacheCommands,
    contract::ContractCommands,
    fiscal::FiscalCommands,
    init::InitArgs,
    links::LinksCommands,
    refresh::RefreshArgs,
    snapshot::SnapshotCommands,
    sub::SubArgs,
};

#[derive(Parser)]
#[command(name = "pacta")]
#[command(author, version, about = "Pacta Contract Toolkit")]
#[command(
    long_about = "Mirrors a remote contract catalog into a local cache, layers local annotations on top, and merges annotation snapshots across machines."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format for listings
    #[arg(long, short = 'f', global = true, default_value = "table")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Project root (default: auto-detect by finding .pacta/)
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new pacta project
    Init(InitArgs),

    /// Refresh contract groups from the live catalog (or inspect the cache)
    Refresh(RefreshArgs),

    /// Contract inspection and removal
    #[command(subcommand)]
    Contract(ContractCommands),

    /// Annotate a contract (status, description, references)
    Annotate(AnnotateArgs),

    /// Export/import portable annotation snapshots
    #[command(subcommand)]
    Snapshot(SnapshotCommands),

    /// Document link management
    #[command(subcommand)]
    Links(LinksCommands),

    /// Fiscal oversight assignments
    #[command(subcommand)]
    Fiscal(FiscalCommands),

    /// Fetch a contract's nested resource (history, payments, ...)
    Sub(SubArgs),

    /// Manage the local contract cache
    #[command(subcommand)]
    Cache(CacheCommands),
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}
