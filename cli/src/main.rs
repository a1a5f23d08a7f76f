#![deny(missing_docs)]

//! # Static Data CLI
//!
//! Command Line Interface for the static data engine.
//!
//! Supported Commands:
//! - `get`: Resolves one record (entity, list, or platform resource).
//! - `many`: Resolves many ids on one platform, or one request on many platforms.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::args::SourceArgs;
use crate::error::CliResult;

mod args;
mod error;
mod get;
mod many;

#[cfg(test)]
mod test_support;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Static game data CLI")]
struct Cli {
    #[clap(flatten)]
    source: SourceArgs,

    /// Log engine activity at debug level.
    #[clap(short, long, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve a single record.
    Get(get::GetArgs),
    /// Resolve many records lazily, one JSON document per element.
    Many(many::ManyArgs),
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> CliResult<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let source = cli.source.build()?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Commands::Get(args) => get::execute(args, &source, &mut out)?,
        Commands::Many(args) => many::execute(args, &source, &mut out)?,
    }

    Ok(())
}
