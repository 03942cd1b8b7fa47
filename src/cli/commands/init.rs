//! `pacta init` - create a new project

use std::path::PathBuf;

use console::style;
use miette::Result;

use crate::core::project::Project;

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    pub path: Option<PathBuf>,

    /// Reinitialize even if .pacta/ already exists
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs) -> Result<()> {
    let path = args.path.unwrap_or_else(|| PathBuf::from("."));
    let project = Project::init(&path, args.force).map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Initialized pacta project at {}",
        style("✓").green(),
        project.root().display()
    );
    println!(
        "  Edit {} to set the catalog URL and group codes",
        project.pacta_dir().join("config.yaml").display()
    );

    Ok(())
}
