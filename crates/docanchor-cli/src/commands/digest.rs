//! `docanchor digest` - print a document's digest without touching a ledger

use crate::commands::CliContext;
use crate::error::CliError;
use crate::output::print_digest;
use clap::Args;
use docanchor_core::Document;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct DigestArgs {
    /// Document to hash
    pub file: PathBuf,
}

pub async fn execute(args: DigestArgs, ctx: &CliContext) -> Result<i32, CliError> {
    let digest = Document::from_path(&args.file)
        .digest()
        .await
        .map_err(CliError::Document)?;
    print_digest(&digest, ctx.json);
    Ok(0)
}
