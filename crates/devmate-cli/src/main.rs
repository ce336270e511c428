use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::convert::ConvertArgs;
use commands::http::HttpArgs;
use commands::uuid::UuidArgs;

#[derive(Debug, Parser)]
#[command(
    name = "devmate",
    version,
    about = "DevMate is a modular CLI toolbox for developers"
)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate random UUIDs
    Uuid(UuidArgs),
    /// Send an HTTP request from the command line
    Http(HttpArgs),
    /// Convert a document between XML and JSON
    Convert(ConvertArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match &cli.command {
        Command::Uuid(args) => commands::uuid::run(args, &mut out)?,
        Command::Http(args) => commands::http::run(args, &mut out)?,
        Command::Convert(args) => commands::convert::run(args, &mut out)?,
    }
    out.flush().context("failed to flush stdout")
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .init();
}
