//! Verification workflow.
//!
//! `DigestComputing -> Querying -> {Succeeded | Failed}`. Read-only: no
//! session and no authorization are involved.

use crate::commands::log_outcome;
use crate::progress::{ProgressEvent, ProgressSink, WorkflowState};
use docanchor_core::core_types::RequestContext;
use docanchor_core::{classify_lookup, log_op_start, Digest, Document, LedgerClient, Outcome};
use std::time::Instant;

pub(crate) const OP_VERIFY: &str = "verify_document";
pub(crate) const OP_VERIFY_DIGEST: &str = "verify_digest";

/// Check whether `document` was recorded, and by whom.
pub async fn verify_document(
    client: &dyn LedgerClient,
    document: &Document,
    progress: &dyn ProgressSink,
) -> Outcome {
    run_verify_document(client, document, progress, &RequestContext::new()).await
}

/// Check a digest computed elsewhere, skipping the digest step.
pub async fn verify_digest(
    client: &dyn LedgerClient,
    digest: &Digest,
    progress: &dyn ProgressSink,
) -> Outcome {
    run_verify_digest(client, digest, progress, &RequestContext::new()).await
}

pub(crate) async fn run_verify_document(
    client: &dyn LedgerClient,
    document: &Document,
    progress: &dyn ProgressSink,
    ctx: &RequestContext,
) -> Outcome {
    let start = Instant::now();
    log_op_start!(
        OP_VERIFY,
        request_id = ctx.request_id.as_str(),
        document = document.label().as_str()
    );

    progress.report(ProgressEvent::new(WorkflowState::DigestComputing));
    let (digest, outcome) = match document.digest().await {
        Ok(digest) => {
            let outcome = query(client, &digest, progress).await;
            (Some(digest), outcome)
        }
        Err(e) => (
            None,
            Outcome::IoFailure {
                detail: e.to_string(),
            },
        ),
    };

    progress.report(ProgressEvent::terminal(&outcome, digest.as_ref()));
    log_outcome(OP_VERIFY, ctx, digest.as_ref(), &outcome, start);
    outcome
}

pub(crate) async fn run_verify_digest(
    client: &dyn LedgerClient,
    digest: &Digest,
    progress: &dyn ProgressSink,
    ctx: &RequestContext,
) -> Outcome {
    let start = Instant::now();
    log_op_start!(
        OP_VERIFY_DIGEST,
        request_id = ctx.request_id.as_str(),
        digest = digest.as_str()
    );

    let outcome = query(client, digest, progress).await;

    progress.report(ProgressEvent::terminal(&outcome, Some(digest)));
    log_outcome(OP_VERIFY_DIGEST, ctx, Some(digest), &outcome, start);
    outcome
}

async fn query(client: &dyn LedgerClient, digest: &Digest, progress: &dyn ProgressSink) -> Outcome {
    progress.report(ProgressEvent::new(WorkflowState::Querying).with_digest(digest));
    match client.lookup_record(digest).await {
        Ok(lookup) if lookup.found => Outcome::Success {
            digest: digest.clone(),
            owner: lookup.owner,
            commitment: None,
        },
        Ok(_) => Outcome::NotFound {
            digest: digest.clone(),
        },
        Err(failure) => {
            tracing::debug!(digest = digest.as_str(), failure = ?failure, "lookup failed");
            classify_lookup(&failure)
        }
    }
}
