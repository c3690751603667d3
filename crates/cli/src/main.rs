// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cide - C++ cross references for ChromiumOS packages

mod color;
mod commands;
mod config;
mod env;
mod exit_error;
mod output;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::board::BoardArgs;
use commands::generate::GenerateArgs;
use commands::resolve::ResolveArgs;
use commands::watch::WatchArgs;
use commands::Context;
use exit_error::ExitError;
use output::OutputFormat;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "+", env!("BUILD_GIT_HASH"));

#[derive(Parser)]
#[command(
    name = "cide",
    version = VERSION,
    about = "Generate compile_commands.json for ChromiumOS packages",
    styles = color::styles()
)]
struct Cli {
    /// Output format
    #[arg(long, short = 'o', value_enum, default_value_t, global = true)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the package that owns a file
    Resolve(ResolveArgs),
    /// Generate and install the compilation database for a file's package
    Generate(GenerateArgs),
    /// Regenerate on editor events until interrupted
    Watch(WatchArgs),
    /// Manage the default board
    Board(BoardArgs),
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(e) = run().await {
        if let Some(exit) = e.downcast_ref::<ExitError>() {
            eprintln!("{}", color::error(&exit.message));
            std::process::exit(exit.code);
        }
        eprintln!("{} {:#}", color::error("Error:"), e);
        std::process::exit(exit_error::EXIT_FAILED);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let ctx = Context::load(cli.output)?;
    match command {
        Commands::Resolve(args) => commands::resolve::handle(&ctx, args).await,
        Commands::Generate(args) => commands::generate::handle(&ctx, args).await,
        Commands::Watch(args) => commands::watch::handle(&ctx, args).await,
        Commands::Board(args) => commands::board::handle(ctx, args),
    }
}

/// Log to stderr so stdout stays parseable; filter from `CIDE_LOG`.
fn init_tracing() {
    let filter = EnvFilter::try_new(env::log_filter()).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
