//! oraplan - Oracle query plan analyzer
//!
//! Runs a SELECT through `EXPLAIN PLAN`, reads the plan back from
//! `PLAN_TABLE` and reports common performance problems found in the plan
//! and in the query text.

mod commands;
mod form;
mod input;
mod logging;
mod render;

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{AnalyzeArgs, CheckArgs};
use oraplan_core::Settings;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "oraplan", version, about = "Oracle query plan analyzer")]
struct Cli {
    /// Settings file (defaults to <config dir>/oraplan/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v, -vv); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Connection form and query loop (default)
    Interactive,
    /// Analyze one query against a server
    Analyze(AnalyzeArgs),
    /// Check one query without connecting
    Check(CheckArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    }
    .context("failed to load settings")?;

    let _log_guard = logging::init(
        logging::LoggingConfig::from_settings(&settings.logging).with_verbosity(cli.verbose),
    )?;

    match cli.command.unwrap_or(Command::Interactive) {
        Command::Interactive => commands::interactive(&settings).await,
        Command::Analyze(args) => commands::analyze(&settings, &args).await,
        Command::Check(args) => commands::check(&settings, &args),
    }
}
