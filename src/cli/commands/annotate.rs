//! `pacta annotate` - record the local annotation layer for a contract

use chrono::Local;
use clap::Args;
use console::style;
use miette::Result;

use crate::cli::args::GlobalOpts;
use crate::cli::helpers::open_project;
use crate::core::cache::ContractCache;
use crate::core::snapshot::TIMESTAMP_FORMAT;
use crate::entities::{AnnotationRecord, STATUS_PALETTE};

#[derive(Args, Debug)]
pub struct AnnotateArgs {
    /// Contract id
    pub id: String,

    /// Status label (e.g. ACTIVE, SIGNED, CLOSED)
    #[arg(long, short = 's')]
    pub status: String,

    /// Replacement description for listings
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Administrative process reference
    #[arg(long)]
    pub admin_process: Option<String>,

    /// Free-form administrative note
    #[arg(long)]
    pub admin_note: Option<String>,

    /// Registry line to append alongside the annotation
    #[arg(long, short = 'n')]
    pub note: Option<String>,
}

pub fn run(args: AnnotateArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let mut cache = ContractCache::open(&project).map_err(|e| miette::miette!("{}", e))?;

    if cache
        .read_contract(&args.id)
        .map_err(|e| miette::miette!("{}", e))?
        .is_none()
    {
        return Err(miette::miette!(
            "Contract {} is not cached. Run 'pacta refresh' first",
            args.id
        ));
    }

    let status = args.status.to_uppercase();
    if !STATUS_PALETTE.contains(&status.as_str()) && !global.quiet {
        eprintln!(
            "{} Status '{}' is outside the usual palette ({})",
            style("⚠").yellow(),
            status,
            STATUS_PALETTE.join(", ")
        );
    }

    let existing = cache
        .read_annotation(&args.id)
        .map_err(|e| miette::miette!("{}", e))?
        .unwrap_or_default();

    let stamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
    let annotation = AnnotationRecord {
        status,
        edited_description: args.description.unwrap_or(existing.edited_description),
        admin_process: args.admin_process.unwrap_or(existing.admin_process),
        admin_note: args.admin_note.unwrap_or(existing.admin_note),
        options: existing.options,
        recorded_at: stamp.clone(),
    };

    cache
        .write_annotation(&args.id, &annotation)
        .map_err(|e| miette::miette!("{}", e))?;

    if let Some(note) = args.note {
        let line = format!("{} | {} | {}", stamp, annotation.status, note);
        cache
            .append_registry(&args.id, &line)
            .map_err(|e| miette::miette!("{}", e))?;
    }

    if !global.quiet {
        println!(
            "{} Annotated {} as {}",
            style("✓").green(),
            args.id,
            annotation.status
        );
    }

    Ok(())
}
