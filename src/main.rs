use clap::Parser;
use miette::Result;
use tracing_subscriber::EnvFilter;

use fgmap::cli::{Cli, Commands};
use fgmap::output::Printer;

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let printer = Printer::new();

    match cli.command {
        Commands::Ingest(args) => fgmap::cli::ingest::run(args, &printer)?,
        Commands::List(args) => fgmap::cli::list::run(args, &printer)?,
        Commands::Completions(args) => fgmap::cli::completions::run(args)?,
    }

    Ok(())
}

fn setup_logging(verbose: bool) {
    let default = if verbose { "warn,fgmap=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
