//! `pacta fiscal` - record who oversees a contract

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::args::{GlobalOpts, OutputFormat};
use crate::cli::helpers::open_project;
use crate::core::cache::ContractCache;
use crate::entities::FiscalAssignment;

#[derive(Subcommand, Debug)]
pub enum FiscalCommands {
    /// Assign oversight roles for a contract
    Set {
        /// Contract id
        id: String,

        /// Contract manager
        #[arg(long)]
        manager: Option<String>,

        /// Deputy contract manager
        #[arg(long)]
        deputy_manager: Option<String>,

        /// Fiscal supervisor
        #[arg(long)]
        supervisor: Option<String>,

        /// Deputy fiscal supervisor
        #[arg(long)]
        deputy_supervisor: Option<String>,

        /// Technical officer
        #[arg(long)]
        technical: Option<String>,

        /// Administrative officer
        #[arg(long)]
        administrative: Option<String>,

        /// Free-form notes about the assignment
        #[arg(long)]
        notes: Option<String>,
    },

    /// Show the oversight assignment for a contract
    Show {
        /// Contract id
        id: String,
    },
}

pub fn run(cmd: FiscalCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        FiscalCommands::Set {
            id,
            manager,
            deputy_manager,
            supervisor,
            deputy_supervisor,
            technical,
            administrative,
            notes,
        } => {
            let project = open_project(global)?;
            let mut cache = ContractCache::open(&project).map_err(|e| miette::miette!("{}", e))?;

            if cache
                .read_contract(&id)
                .map_err(|e| miette::miette!("{}", e))?
                .is_none()
            {
                return Err(miette::miette!(
                    "Contract {} is not cached. Run 'pacta refresh' first",
                    id
                ));
            }

            let mut fiscal = cache
                .read_fiscal(&id)
                .map_err(|e| miette::miette!("{}", e))?
                .unwrap_or_default();

            overlay(&mut fiscal.manager, manager);
            overlay(&mut fiscal.deputy_manager, deputy_manager);
            overlay(&mut fiscal.supervisor, supervisor);
            overlay(&mut fiscal.deputy_supervisor, deputy_supervisor);
            overlay(&mut fiscal.technical_officer, technical);
            overlay(&mut fiscal.administrative_officer, administrative);
            if let Some(notes) = notes {
                fiscal.notes = notes;
            }

            if fiscal.is_empty() {
                return Err(miette::miette!(
                    "Nothing to record. Pass at least one role flag or --notes"
                ));
            }

            cache
                .write_fiscal(&id, &fiscal)
                .map_err(|e| miette::miette!("{}", e))?;

            if !global.quiet {
                println!("{} Fiscal assignment saved for {}", style("✓").green(), id);
            }
            Ok(())
        }

        FiscalCommands::Show { id } => {
            let project = open_project(global)?;
            let cache = ContractCache::open(&project).map_err(|e| miette::miette!("{}", e))?;

            let Some(fiscal) = cache
                .read_fiscal(&id)
                .map_err(|e| miette::miette!("{}", e))?
            else {
                println!("No fiscal assignment recorded for {}", id);
                return Ok(());
            };

            if global.format == OutputFormat::Json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&fiscal).map_err(|e| miette::miette!("{}", e))?
                );
                return Ok(());
            }

            print_assignment(&id, &fiscal);
            Ok(())
        }
    }
}

fn overlay(slot: &mut Option<String>, incoming: Option<String>) {
    if incoming.is_some() {
        *slot = incoming;
    }
}

fn print_assignment(id: &str, fiscal: &FiscalAssignment) {
    println!("{}", style(id).bold());
    for (label, holder) in [
        ("Manager", &fiscal.manager),
        ("Deputy manager", &fiscal.deputy_manager),
        ("Supervisor", &fiscal.supervisor),
        ("Deputy supervisor", &fiscal.deputy_supervisor),
        ("Technical officer", &fiscal.technical_officer),
        ("Administrative", &fiscal.administrative_officer),
    ] {
        println!(
            "  {:<19} {}",
            format!("{}:", label),
            holder.as_deref().unwrap_or("-")
        );
    }
    if !fiscal.notes.is_empty() {
        println!("  Notes: {}", fiscal.notes);
    }
    if let Some(updated) = fiscal.updated_at {
        println!("  {}", style(format!("Updated {}", updated.format("%Y-%m-%d %H:%M"))).dim());
    }
}
