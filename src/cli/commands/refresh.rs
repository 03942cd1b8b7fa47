//! `pacta refresh` - reconcile groups against the live catalog

use console::style;
use miette::Result;

use crate::cli::args::GlobalOpts;
use crate::cli::helpers::{build_fetcher, format_age, open_project, resolve_groups};
use crate::core::cache::ContractCache;
use crate::core::config::Config;
use crate::core::reconcile::reconcile;

#[derive(clap::Args, Debug)]
pub struct RefreshArgs {
    /// Group to refresh (default: every configured group)
    #[arg(long, short = 'g')]
    pub group: Option<String>,

    /// Report what the cache holds instead of hitting the catalog
    #[arg(long)]
    pub cached: bool,
}

pub fn run(args: RefreshArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let config = Config::load(Some(&project));
    let mut cache = ContractCache::open(&project).map_err(|e| miette::miette!("{}", e))?;
    let groups = resolve_groups(args.group, &config)?;

    if args.cached {
        for group in &groups {
            let ids = cache.read_ids(group).map_err(|e| miette::miette!("{}", e))?;
            let age = cache
                .group_refreshed_at(group)
                .map_err(|e| miette::miette!("{}", e))?;
            println!(
                "{} Group {}: {} cached contract(s), {}",
                style("→").blue(),
                group,
                ids.len(),
                format_age(age)
            );
        }
        return Ok(());
    }

    let fetcher = build_fetcher(&config)?;
    for group in &groups {
        match reconcile(&fetcher, &mut cache, group) {
            Ok(stats) => {
                println!(
                    "{} Group {} refreshed: {} added, {} removed",
                    style("✓").green(),
                    group,
                    stats.added,
                    stats.removed
                );
            }
            Err(e) => {
                // the cache is untouched for this group; keep going so one
                // unreachable group doesn't block the rest of the run
                eprintln!("{} Group {}: {}", style("✗").red(), group, e);
            }
        }
    }

    Ok(())
}
