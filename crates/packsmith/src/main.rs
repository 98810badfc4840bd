//! packsmith CLI - merged modpack builds on top of packwiz
//!
//! This is the main entry point for the packsmith command-line interface.

mod cli;
mod commands;
mod output;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};
use commands::common::CommandContext;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    let ctx = CommandContext::load(cli.config.as_deref(), cli.json, cli.quiet, cli.no_color)?;

    match cli.command {
        Commands::Build(args) => commands::build::run(args, &ctx).await,
        Commands::Sync(args) => commands::sync::run(args, &ctx).await,
        Commands::Update(args) => commands::update::run(args, &ctx).await,
        Commands::Export(args) => commands::export::run(args, &ctx).await,
    }
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
