use clap::Parser;
use miette::Result;
use pacta::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    // This is standard practice for CLI tools that output to stdout.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    // Install miette's fancy error handler for beautiful diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    match cli.command {
        Commands::Init(args) => pacta::cli::commands::init::run(args),
        Commands::Refresh(args) => pacta::cli::commands::refresh::run(args, &global),
        Commands::Contract(cmd) => pacta::cli::commands::contract::run(cmd, &global),
        Commands::Annotate(args) => pacta::cli::commands::annotate::run(args, &global),
        Commands::Snapshot(cmd) => pacta::cli::commands::snapshot::run(cmd, &global),
        Commands::Links(cmd) => pacta::cli::commands::links::run(cmd, &global),
        Commands::Fiscal(cmd) => pacta::cli::commands::fiscal::run(cmd, &global),
        Commands::Sub(args) => pacta::cli::commands::sub::run(args, &global),
        Commands::Cache(cmd) => pacta::cli::commands::cache::run(cmd, &global),
    }
}
