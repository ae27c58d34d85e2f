//! Engine-level commands for presentation layers.

use crate::commands::issue::run_issue;
use crate::commands::verify::{run_verify_digest, run_verify_document};
use crate::progress::ProgressSink;
use docanchor_core::core_types::RequestContext;
use docanchor_core::{Digest, Document, LedgerClient, Outcome, Session};

/// One workflow invocation.
#[derive(Debug, Clone)]
pub enum EngineCommand {
    /// Record a document under the session's identity.
    Issue { session: Session, document: Document },
    /// Look up a document's digest.
    Verify { document: Document },
    /// Look up a digest computed elsewhere.
    VerifyDigest { digest: Digest },
}

impl EngineCommand {
    /// Operation name used in log events
    pub fn op(&self) -> &'static str {
        match self {
            EngineCommand::Issue { .. } => crate::commands::issue::OP_ISSUE,
            EngineCommand::Verify { .. } => crate::commands::verify::OP_VERIFY,
            EngineCommand::VerifyDigest { .. } => crate::commands::verify::OP_VERIFY_DIGEST,
        }
    }
}

/// Apply an engine command under the caller's request context.
pub async fn apply_engine_command(
    cmd: EngineCommand,
    client: &dyn LedgerClient,
    progress: &dyn ProgressSink,
    ctx: &RequestContext,
) -> Outcome {
    match cmd {
        EngineCommand::Issue { session, document } => {
            run_issue(client, &session, &document, progress, ctx).await
        }
        EngineCommand::Verify { document } => {
            run_verify_document(client, &document, progress, ctx).await
        }
        EngineCommand::VerifyDigest { digest } => {
            run_verify_digest(client, &digest, progress, ctx).await
        }
    }
}
