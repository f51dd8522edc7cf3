pub mod completions;
pub mod ingest;
pub mod list;

use clap::{Parser, Subcommand};

/// fgmap - Fantasy Grounds battlemap ingest
#[derive(Parser, Debug)]
#[command(name = "fgmap")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Show debug logging from fgmap
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Import a directory of maps into a campaign
    Ingest(ingest::IngestArgs),

    /// List the maps stored in a campaign
    List(list::ListArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}
