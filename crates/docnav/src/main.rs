//! docnav CLI - Documentation navigation resolver.
//!
//! Provides commands for:
//! - `nav`: Print the resolved navigation model as JSON
//! - `routes`: List every page with its source file
//! - `check`: Resolve and report problems

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CheckArgs, NavArgs, RoutesArgs, SourceArgs};
use output::Output;

/// docnav - Documentation navigation resolver.
#[derive(Parser)]
#[command(name = "docnav", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resolved navigation model as JSON.
    Nav(NavArgs),
    /// List routes as `link<TAB>source` lines.
    Routes(RoutesArgs),
    /// Resolve navigation and report section and route counts.
    Check(CheckArgs),
}

impl Commands {
    fn source(&self) -> &SourceArgs {
        match self {
            Self::Nav(args) => &args.source,
            Self::Routes(args) => &args.source,
            Self::Check(args) => &args.source,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.command.source().verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Nav(args) => args.execute(),
        Commands::Routes(args) => args.execute(),
        Commands::Check(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
