//! prepress CLI - documentation preprocessing.
//!
//! Provides commands for:
//! - `process`: Rewrite a markdown docs tree before rendering
//! - `patch`: Patch the built site's front-end bundle

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{PatchArgs, ProcessArgs};
use output::Output;

/// prepress - documentation preprocessing.
#[derive(Parser)]
#[command(name = "prepress", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply the rewrite pipeline to a docs tree.
    Process(ProcessArgs),
    /// Apply the post-build patch to the site bundle.
    Patch(PatchArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = match &cli.command {
        Commands::Process(args) => args.verbose,
        Commands::Patch(args) => args.verbose,
    };

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::Process(args) => args.execute(),
        Commands::Patch(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
