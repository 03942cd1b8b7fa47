//! `pacta sub` - fetch per-contract sub-resources

use clap::Args;
use console::style;
use miette::Result;

use crate::cli::args::GlobalOpts;
use crate::cli::helpers::{build_fetcher, open_project};
use crate::core::cache::ContractCache;
use crate::core::config::Config;
use crate::core::fetch::{FetchMode, SubResource};

#[derive(Args, Debug)]
pub struct SubArgs {
    /// Contract id
    pub id: String,

    /// Which sub-resource to fetch
    #[arg(value_enum)]
    pub kind: SubResource,

    /// Read from the local cache instead of the catalog
    #[arg(long)]
    pub cached: bool,
}

pub fn run(args: SubArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let config = Config::load(Some(&project));
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

    let payloads = if args.cached {
        cache
            .read_sub(&args.id, args.kind)
            .map_err(|e| miette::miette!("{}", e))?
    } else {
        let fetcher = build_fetcher(&config)?;
        fetcher
            .fetch_sub(&mut cache, &args.id, args.kind, FetchMode::Live)
            .map_err(|e| miette::miette!("{}", e))?
    };

    if payloads.is_empty() {
        println!("No {} entries for {}", args.kind, args.id);
        return Ok(());
    }

    println!(
        "{}",
        serde_json::to_string_pretty(&payloads).map_err(|e| miette::miette!("{}", e))?
    );
    if !global.quiet {
        eprintln!(
            "{} {} {} entr(ies) for {}",
            style("✓").green(),
            payloads.len(),
            args.kind,
            args.id
        );
    }

    Ok(())
}
