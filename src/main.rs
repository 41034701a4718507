use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "toposort")]
#[command(about = "Leveled topological sorting of graphs that may contain cycles", long_about = None)]
#[command(version)]
struct Cli {
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sort a graph file into topological levels, removing cyclic edges
    Sort {
        /// Graph file (.json, .yaml or .yml)
        file: PathBuf,

        /// Node that must end up with no incoming edge (overrides the file's start_node)
        #[arg(long)]
        start: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the cycles of a graph file and the edges that take part in them
    Cycles {
        /// Graph file (.json, .yaml or .yml)
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check fixture files against their expected cyclic edges and levels
    Check {
        /// A fixture file, or a directory of fixtures
        path: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match cli.command {
        Commands::Sort { file, start, json } => commands::sort::run(&file, start, json),
        Commands::Cycles { file, json } => commands::cycles::run(&file, json),
        Commands::Check { path, json } => commands::check::run(&path, json),
    }
}
