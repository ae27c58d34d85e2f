//! `docanchor issue` - record a document on the ledger

use crate::commands::{connect_failure, open_ledger, CliContext};
use crate::config::Backend;
use crate::error::CliError;
use crate::output::{exit_code, print_outcome, progress_sink};
use clap::Args;
use docanchor_core::core_types::RequestContext;
use docanchor_core::{Document, Identity};
use docanchor_engine::{apply_engine_command, EngineCommand};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct IssueArgs {
    /// Document to record
    pub file: PathBuf,

    /// Issuing identity (overrides `identity` from configuration)
    #[arg(long)]
    pub identity: Option<String>,
}

pub async fn execute(args: IssueArgs, ctx: &CliContext) -> Result<i32, CliError> {
    let identity = args
        .identity
        .or_else(|| ctx.config.identity.clone())
        .map(|value| Identity::parse(&value))
        .transpose()
        .map_err(|e| CliError::invalid_arg(e.to_string()))?;

    if identity.is_none() && ctx.config.ledger.backend == Backend::Sqlite {
        return Err(CliError::config(
            "issuing to the sqlite ledger requires --identity or DOCANCHOR_IDENTITY",
        ));
    }

    let ledger = open_ledger(&ctx.config, identity)?;
    let progress = progress_sink(ctx.json);

    let outcome = match ledger.connect().await {
        Ok(session) => {
            let cmd = EngineCommand::Issue {
                session,
                document: Document::from_path(&args.file),
            };
            apply_engine_command(cmd, &*ledger, &*progress, &RequestContext::new()).await
        }
        Err(failure) => connect_failure(&failure),
    };

    print_outcome(&outcome, ctx.json);
    Ok(exit_code(&outcome))
}
