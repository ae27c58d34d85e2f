//! `docanchor verify` - check a document or digest against the ledger

use crate::commands::{open_ledger, CliContext};
use crate::error::CliError;
use crate::output::{exit_code, print_outcome, progress_sink};
use clap::Args;
use docanchor_core::core_types::RequestContext;
use docanchor_core::{Digest, Document};
use docanchor_engine::{apply_engine_command, EngineCommand};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct VerifyArgs {
    /// Document to verify
    #[arg(required_unless_present = "digest", conflicts_with = "digest")]
    pub file: Option<PathBuf>,

    /// Verify a hex SHA-256 digest instead of a file
    #[arg(long)]
    pub digest: Option<String>,
}

pub async fn execute(args: VerifyArgs, ctx: &CliContext) -> Result<i32, CliError> {
    let cmd = match (args.file, args.digest) {
        (Some(file), _) => EngineCommand::Verify {
            document: Document::from_path(file),
        },
        (None, Some(hex)) => EngineCommand::VerifyDigest {
            digest: Digest::parse(&hex).map_err(|e| CliError::invalid_arg(e.to_string()))?,
        },
        (None, None) => return Err(CliError::invalid_arg("a file or --digest is required")),
    };

    let ledger = open_ledger(&ctx.config, None)?;
    let progress = progress_sink(ctx.json);
    let outcome = apply_engine_command(cmd, &*ledger, &*progress, &RequestContext::new()).await;

    print_outcome(&outcome, ctx.json);
    Ok(exit_code(&outcome))
}
