//! `pacta contract` - inspect and remove cached contracts

use clap::Subcommand;
use console::style;
use miette::Result;
use tabled::{builder::Builder, settings::Style};

use crate::cli::args::{GlobalOpts, OutputFormat};
use crate::cli::helpers::open_project;
use crate::core::cache::ContractCache;

#[derive(Subcommand, Debug)]
pub enum ContractCommands {
    /// List cached contracts
    List {
        /// Restrict to one group
        #[arg(long, short = 'g')]
        group: Option<String>,
    },

    /// Show one contract with its annotation layer
    Show {
        /// Contract id
        id: String,
    },

    /// Remove a contract and everything attached to it
    Delete {
        /// Contract id
        id: String,
    },
}

pub fn run(cmd: ContractCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ContractCommands::List { group } => run_list(group, global),
        ContractCommands::Show { id } => run_show(&id, global),
        ContractCommands::Delete { id } => run_delete(&id, global),
    }
}

fn run_list(group: Option<String>, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let cache = ContractCache::open(&project).map_err(|e| miette::miette!("{}", e))?;
    let contracts = cache
        .list_contracts(group.as_deref())
        .map_err(|e| miette::miette!("{}", e))?;

    if global.format == OutputFormat::Json {
        println!(
            "{}",
            serde_json::to_string_pretty(&contracts).map_err(|e| miette::miette!("{}", e))?
        );
        return Ok(());
    }

    if contracts.is_empty() {
        println!("No cached contracts. Run 'pacta refresh' first");
        return Ok(());
    }

    let mut builder = Builder::default();
    builder.push_record(["ID", "Number", "Group", "Supplier", "Valid to", "Status"]);
    for contract in &contracts {
        let status = cache
            .read_annotation(&contract.id)
            .ok()
            .flatten()
            .map(|a| a.status)
            .unwrap_or_default();
        let valid_to = contract
            .valid_to
            .map(|d| d.to_string())
            .unwrap_or_default();
        builder.push_record([
            contract.id.as_str(),
            contract.number.as_deref().unwrap_or(""),
            contract.group_code.as_str(),
            contract.supplier_name.as_deref().unwrap_or(""),
            valid_to.as_str(),
            status.as_str(),
        ]);
    }
    println!("{}", builder.build().with(Style::markdown()));

    if !global.quiet {
        println!("{} contract(s)", contracts.len());
    }

    Ok(())
}

fn run_show(id: &str, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let cache = ContractCache::open(&project).map_err(|e| miette::miette!("{}", e))?;

    let Some(contract) = cache
        .read_contract(id)
        .map_err(|e| miette::miette!("{}", e))?
    else {
        return Err(miette::miette!("Contract {} is not cached", id));
    };

    if global.format == OutputFormat::Json {
        println!(
            "{}",
            serde_json::to_string_pretty(&contract).map_err(|e| miette::miette!("{}", e))?
        );
        return Ok(());
    }

    println!("{}", style(&contract.id).bold());
    println!("{}", style("─".repeat(40)).dim());
    println!("  Group:     {}", contract.group_code);
    println!("  Number:    {}", contract.number.as_deref().unwrap_or("-"));
    println!("  Process:   {}", contract.process_id.as_deref().unwrap_or("-"));
    println!(
        "  Supplier:  {} ({})",
        contract.supplier_name.as_deref().unwrap_or("-"),
        contract.supplier_tax_id.as_deref().unwrap_or("-")
    );
    if let Some(value) = contract.value {
        println!("  Value:     {:.2}", value);
    }
    println!(
        "  Validity:  {} to {}",
        contract
            .valid_from
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string()),
        contract
            .valid_to
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string())
    );

    if let Some(ann) = cache
        .read_annotation(id)
        .map_err(|e| miette::miette!("{}", e))?
    {
        println!();
        println!("  {}", style("Annotation").bold());
        println!("    Status:      {}", ann.status);
        if !ann.edited_description.is_empty() {
            println!("    Description: {}", ann.edited_description);
        }
        if !ann.admin_process.is_empty() {
            println!("    Process ref: {}", ann.admin_process);
        }
        if !ann.admin_note.is_empty() {
            println!("    Note:        {}", ann.admin_note);
        }
        println!("    Recorded at: {}", ann.recorded_at);
    }

    let registry = cache
        .read_registry(id)
        .map_err(|e| miette::miette!("{}", e))?;
    if !registry.is_empty() {
        println!();
        println!("  {}", style("Registry").bold());
        for entry in registry {
            println!("    {}", entry);
        }
    }

    if let Some(links) = cache.read_links(id).map_err(|e| miette::miette!("{}", e))? {
        println!();
        println!("  {}", style("Links").bold());
        for (label, url) in [
            ("Contract", &links.contract_url),
            ("Amendment", &links.amendment_url),
            ("Ordinance", &links.ordinance_url),
            ("Portal ref", &links.portal_ref_url),
            ("Institutional", &links.institutional_url),
        ] {
            if let Some(url) = url {
                println!("    {:<13} {}", format!("{}:", label), url);
            }
        }
    }

    if let Some(fiscal) = cache
        .read_fiscal(id)
        .map_err(|e| miette::miette!("{}", e))?
    {
        println!();
        println!("  {}", style("Fiscal oversight").bold());
        for (label, holder) in [
            ("Manager", &fiscal.manager),
            ("Deputy manager", &fiscal.deputy_manager),
            ("Supervisor", &fiscal.supervisor),
            ("Deputy supervisor", &fiscal.deputy_supervisor),
            ("Technical", &fiscal.technical_officer),
            ("Administrative", &fiscal.administrative_officer),
        ] {
            if let Some(holder) = holder {
                println!("    {:<18} {}", format!("{}:", label), holder);
            }
        }
        if !fiscal.notes.is_empty() {
            println!("    Notes: {}", fiscal.notes);
        }
    }

    Ok(())
}

fn run_delete(id: &str, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let mut cache = ContractCache::open(&project).map_err(|e| miette::miette!("{}", e))?;

    if cache
        .delete_contract(id)
        .map_err(|e| miette::miette!("{}", e))?
    {
        println!("{} Deleted contract {}", style("✓").green(), id);
    } else {
        eprintln!(
            "{} Contract {} was not cached; nothing to delete",
            style("⚠").yellow(),
            id
        );
    }

    Ok(())
}
