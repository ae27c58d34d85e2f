//! DocAnchor CLI
//!
//! Command-line interface for issuing and verifying document digests

use clap::{Parser, Subcommand};
use docanchor_core::logging_facility::{init, Profile};
use std::path::PathBuf;

mod commands;
mod config;
mod error;
mod output;

use crate::commands::CliContext;
use crate::config::AppConfig;
use crate::error::CliError;

#[derive(Debug, Parser)]
#[command(name = "docanchor")]
#[command(about = "DocAnchor - Anchor document digests on a ledger and verify them", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./docanchor.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compute a document's digest
    Digest(commands::digest::DigestArgs),
    /// Record a document's digest on the ledger
    Issue(commands::issue::IssueArgs),
    /// Verify a document or digest against the ledger
    Verify(commands::verify::VerifyArgs),
}

async fn run(cli: Cli) -> Result<i32, CliError> {
    let config = AppConfig::load(cli.config.as_deref())?;
    let profile: Profile = config.log.profile.parse().map_err(CliError::config)?;
    init(profile);

    let ctx = CliContext {
        config,
        json: cli.json,
    };

    match cli.command {
        Commands::Digest(args) => commands::digest::execute(args, &ctx).await,
        Commands::Issue(args) => commands::issue::execute(args, &ctx).await,
        Commands::Verify(args) => commands::verify::execute(args, &ctx).await,
    }
}

#[tokio::main]
async fn main() {
    // Load .env file (ignore if not found)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    };
    std::process::exit(code);
}
