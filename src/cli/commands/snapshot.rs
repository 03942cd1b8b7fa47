//! `pacta snapshot` - exchange annotation layers between machines

use std::path::PathBuf;

use chrono::Local;
use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::args::GlobalOpts;
use crate::cli::helpers::open_project;
use crate::core::cache::ContractCache;
use crate::core::snapshot::{read_snapshot_file, write_snapshot_file};

#[derive(Subcommand, Debug)]
pub enum SnapshotCommands {
    /// Write all annotated contracts to a snapshot file
    Export {
        /// Output path (defaults to .pacta/snapshots/<date>.json)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Merge a snapshot file into the local cache (last write wins)
    Import {
        /// Snapshot file produced by 'pacta snapshot export'
        file: PathBuf,
    },
}

pub fn run(cmd: SnapshotCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        SnapshotCommands::Export { output } => run_export(output, global),
        SnapshotCommands::Import { file } => run_import(file, global),
    }
}

fn run_export(output: Option<PathBuf>, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let cache = ContractCache::open(&project).map_err(|e| miette::miette!("{}", e))?;

    let entries = cache
        .export_snapshot()
        .map_err(|e| miette::miette!("{}", e))?;

    let path = match output {
        Some(path) => path,
        None => {
            let stamp = Local::now().format("%Y%m%d-%H%M%S");
            project.snapshots_dir().join(format!("{}.json", stamp))
        }
    };

    write_snapshot_file(&path, &entries).map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Exported {} annotation(s) to {}",
        style("✓").green(),
        entries.len(),
        path.display()
    );

    Ok(())
}

fn run_import(file: PathBuf, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let mut cache = ContractCache::open(&project).map_err(|e| miette::miette!("{}", e))?;

    let entries = read_snapshot_file(&file).map_err(|e| miette::miette!("{}", e))?;
    let stats = cache
        .import_snapshot(&entries)
        .map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Imported snapshot: {} applied, {} kept local, {} malformed",
        style("✓").green(),
        stats.applied,
        stats.skipped,
        stats.malformed
    );
    if stats.malformed > 0 {
        eprintln!(
            "{} {} entr(ies) referenced unknown contracts or were missing required fields",
            style("⚠").yellow(),
            stats.malformed
        );
    }

    Ok(())
}
