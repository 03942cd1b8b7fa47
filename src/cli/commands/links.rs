//! `pacta links` - bulk-load document links from a spreadsheet export

use std::path::PathBuf;

use chrono::Utc;
use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::args::GlobalOpts;
use crate::cli::helpers::open_project;
use crate::core::cache::ContractCache;
use crate::core::canonical::{CompactKey, KeyIndex, MatchSummary};
use crate::entities::LinksRecord;

#[derive(Subcommand, Debug)]
pub enum LinksCommands {
    /// Import document links from a CSV keyed by compact contract keys
    Import {
        /// CSV file with columns: key, contract_document, amendment_document
        file: PathBuf,

        /// Match and report without writing anything
        #[arg(long)]
        dry_run: bool,
    },
}

pub fn run(cmd: LinksCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        LinksCommands::Import { file, dry_run } => run_import(file, dry_run, global),
    }
}

fn run_import(file: PathBuf, dry_run: bool, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let mut cache = ContractCache::open(&project).map_err(|e| miette::miette!("{}", e))?;

    let index = KeyIndex::build(&cache, Utc::now().date_naive())
        .map_err(|e| miette::miette!("{}", e))?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(&file)
        .into_diagnostic()?;

    let headers = reader.headers().into_diagnostic()?.clone();
    let col = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
    let (Some(key_col), Some(contract_col), Some(amendment_col)) = (
        col("key"),
        col("contract_document"),
        col("amendment_document"),
    ) else {
        return Err(miette::miette!(
            "CSV must carry 'key', 'contract_document' and 'amendment_document' columns"
        ));
    };

    let mut summary = MatchSummary::default();
    let mut malformed = 0usize;

    for (row, record) in reader.records().enumerate() {
        let record = record.into_diagnostic()?;
        let Some(raw_key) = record.get(key_col).filter(|k| !k.is_empty()) else {
            continue;
        };

        let compact = match CompactKey::parse(raw_key) {
            Ok(compact) => compact,
            Err(_) => {
                malformed += 1;
                if !global.quiet {
                    eprintln!(
                        "{} Row {}: malformed key '{}'",
                        style("⚠").yellow(),
                        row + 2,
                        raw_key
                    );
                }
                continue;
            }
        };

        let Some(id) = index.lookup(&compact).map(str::to_string) else {
            summary.unmatched.push(raw_key.to_string());
            continue;
        };

        let incoming = LinksRecord {
            contract_url: cell_url(record.get(contract_col)),
            amendment_url: cell_url(record.get(amendment_col)),
            ..Default::default()
        };
        if incoming.is_empty() {
            continue;
        }

        summary.matched += 1;
        if dry_run {
            continue;
        }

        let mut links = cache
            .read_links(&id)
            .map_err(|e| miette::miette!("{}", e))?
            .unwrap_or_default();
        links.merge(&incoming);
        cache
            .write_links(&id, &links)
            .map_err(|e| miette::miette!("{}", e))?;
    }

    let verb = if dry_run { "would update" } else { "updated" };
    println!(
        "{} Links import: {} row(s) {}, {} unmatched, {} malformed",
        style("✓").green(),
        summary.matched,
        verb,
        summary.unmatched.len(),
        malformed
    );
    for key in &summary.unmatched {
        eprintln!("  {} no cached contract for key '{}'", style("→").dim(), key);
    }

    Ok(())
}

/// Extract a URL from a cell. Spreadsheet exports sometimes keep the
/// `=HYPERLINK("url";"label")` formula; "XXX" marks a slot left blank on
/// purpose.
fn cell_url(cell: Option<&str>) -> Option<String> {
    let cell = cell?.trim();
    if cell.is_empty() || cell.eq_ignore_ascii_case("xxx") {
        return None;
    }

    if let Some(rest) = cell.strip_prefix("=HYPERLINK(") {
        let mut quoted = rest.split('"');
        quoted.next();
        if let Some(url) = quoted.next() {
            return Some(url.to_string());
        }
    }

    Some(cell.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_url_plain() {
        assert_eq!(
            cell_url(Some("https://example.org/doc.pdf")),
            Some("https://example.org/doc.pdf".to_string())
        );
    }

    #[test]
    fn test_cell_url_sentinel_and_empty() {
        assert_eq!(cell_url(Some("XXX")), None);
        assert_eq!(cell_url(Some("xxx")), None);
        assert_eq!(cell_url(Some("  ")), None);
        assert_eq!(cell_url(None), None);
    }

    #[test]
    fn test_cell_url_hyperlink_formula() {
        assert_eq!(
            cell_url(Some("=HYPERLINK(\"https://example.org/a.pdf\";\"contract\")")),
            Some("https://example.org/a.pdf".to_string())
        );
    }
}
