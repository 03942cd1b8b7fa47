//! `pacta cache` - inspect and reset the local contract cache
//!
//! The cache is a local SQLite database (gitignored) holding the fetched
//! catalog records plus everything authored locally on top of them. Clearing
//! it loses annotations that were never exported to a snapshot.

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::args::{GlobalOpts, OutputFormat};
use crate::cli::helpers::{format_age, open_project};
use crate::core::cache::ContractCache;

#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Show cache statistics
    Status,

    /// Execute SQL query against the cache (read-only)
    Query {
        /// SQL query to execute
        sql: String,
    },

    /// Drop every cached record and annotation
    Clear,
}

pub fn run(cmd: CacheCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        CacheCommands::Status => run_status(global),
        CacheCommands::Query { sql } => run_query(&sql, global),
        CacheCommands::Clear => run_clear(global),
    }
}

fn run_status(global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let cache = ContractCache::open(&project).map_err(|e| miette::miette!("{}", e))?;

    let stats = cache.statistics().map_err(|e| miette::miette!("{}", e))?;

    println!("{}", style("Cache Status").bold());
    println!("{}", style("─".repeat(40)).dim());
    println!("  Location:        {}", project.cache_path().display());
    println!("  Total contracts: {}", style(stats.total_contracts).cyan());
    println!("  Annotated:       {}", style(stats.annotated).cyan());
    println!(
        "  Database size:   {} KB",
        style(stats.db_size_bytes / 1024).cyan()
    );

    if !stats.by_group.is_empty() {
        println!();
        println!("  {}", style("By group:").bold());
        for group in &stats.by_group {
            println!(
                "    {:<10} {:>5}  ({})",
                group.group_code,
                group.contracts,
                format_age(group.refreshed_at)
            );
        }
    }

    Ok(())
}

fn run_query(sql: &str, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let cache = ContractCache::open(&project).map_err(|e| miette::miette!("{}", e))?;

    let columns = cache
        .query_columns(sql)
        .map_err(|e| miette::miette!("{}", e))?;
    let rows = cache.query_raw(sql).map_err(|e| miette::miette!("{}", e))?;

    match global.format {
        OutputFormat::Json => {
            let json_rows: Vec<serde_json::Value> = rows
                .iter()
                .map(|row| {
                    let mut obj = serde_json::Map::new();
                    for (i, col) in columns.iter().enumerate() {
                        if let Some(val) = row.get(i) {
                            obj.insert(col.clone(), serde_json::Value::String(val.clone()));
                        }
                    }
                    serde_json::Value::Object(obj)
                })
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&json_rows).map_err(|e| miette::miette!("{}", e))?
            );
        }
        OutputFormat::Table => {
            println!("{}", columns.join("\t"));
            for row in rows {
                println!("{}", row.join("\t"));
            }
        }
    }

    Ok(())
}

fn run_clear(global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let cache_path = project.cache_path();

    if cache_path.exists() {
        std::fs::remove_file(&cache_path)
            .map_err(|e| miette::miette!("Failed to remove cache: {}", e))?;

        // Also remove WAL and journal files if they exist
        let _ = std::fs::remove_file(cache_path.with_extension("db-journal"));
        let _ = std::fs::remove_file(cache_path.with_extension("db-wal"));
        let _ = std::fs::remove_file(cache_path.with_extension("db-shm"));

        println!("{} Cache cleared", style("✓").green());
    } else {
        println!("No cache to clear");
    }

    Ok(())
}
