//! docdiff CLI - Confluence version history reports.
//!
//! Provides commands for:
//! - `generate`: Snapshot a space and publish the diff against a previous release
//! - `export`: Export a space as PDF to a local file

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ConnectionArgs, ExportArgs, GenerateArgs};
use output::Output;

/// docdiff - Confluence version history reports.
#[derive(Parser)]
#[command(name = "docdiff", version, about)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Log progress (otherwise RUST_LOG is honored).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Snapshot a space and publish the changes since a previous release.
    Generate(GenerateArgs),
    /// Export a space as PDF.
    Export(ExportArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Generate(args) => args.execute(&cli.connection, &output),
        Commands::Export(args) => args.execute(&cli.connection, &output),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
