//! Issuance workflow.
//!
//! `DigestComputing -> AwaitingAuthorization -> AwaitingConfirmation ->
//! {Succeeded | Failed}`. One submission per invocation, never retried.
//! Concurrent invocations for the same digest are submitted independently;
//! the ledger decides which one wins.

use crate::commands::log_outcome;
use crate::progress::{ProgressEvent, ProgressSink, WorkflowState};
use docanchor_core::core_types::RequestContext;
use docanchor_core::{classify, log_op_start, Digest, Document, LedgerClient, Outcome, Session};
use std::time::Instant;

pub(crate) const OP_ISSUE: &str = "issue_document";

/// Record `document`'s digest on the ledger under the session's identity.
///
/// Never fails: every error path is an `Outcome`.
pub async fn issue_document(
    client: &dyn LedgerClient,
    session: &Session,
    document: &Document,
    progress: &dyn ProgressSink,
) -> Outcome {
    run_issue(client, session, document, progress, &RequestContext::new()).await
}

pub(crate) async fn run_issue(
    client: &dyn LedgerClient,
    session: &Session,
    document: &Document,
    progress: &dyn ProgressSink,
    ctx: &RequestContext,
) -> Outcome {
    let start = Instant::now();
    log_op_start!(
        OP_ISSUE,
        request_id = ctx.request_id.as_str(),
        session_id = session.id().as_str(),
        owner = session.identity().as_str(),
        document = document.label().as_str()
    );

    let (digest, outcome) = issue_steps(client, session, document, progress).await;

    progress.report(ProgressEvent::terminal(&outcome, digest.as_ref()));
    log_outcome(OP_ISSUE, ctx, digest.as_ref(), &outcome, start);
    outcome
}

async fn issue_steps(
    client: &dyn LedgerClient,
    session: &Session,
    document: &Document,
    progress: &dyn ProgressSink,
) -> (Option<Digest>, Outcome) {
    progress.report(ProgressEvent::new(WorkflowState::DigestComputing));
    let digest = match document.digest().await {
        Ok(digest) => digest,
        Err(e) => {
            return (
                None,
                Outcome::IoFailure {
                    detail: e.to_string(),
                },
            )
        }
    };
    tracing::debug!(digest = digest.as_str(), "digest computed");

    progress.report(ProgressEvent::new(WorkflowState::AwaitingAuthorization).with_digest(&digest));
    let pending = match client.submit_record(session, &digest).await {
        Ok(pending) => pending,
        Err(failure) => {
            tracing::debug!(digest = digest.as_str(), failure = ?failure, "submission rejected");
            let outcome = classify(&failure, &digest);
            return (Some(digest), outcome);
        }
    };

    progress.report(
        ProgressEvent::new(WorkflowState::AwaitingConfirmation)
            .with_digest(&digest)
            .with_tx_id(&pending.tx_id),
    );
    let outcome = match client.await_commitment(&pending).await {
        Ok(commitment) => Outcome::Success {
            digest: digest.clone(),
            owner: Some(pending.owner.clone()),
            commitment: Some(commitment),
        },
        Err(failure) => {
            tracing::debug!(digest = digest.as_str(), tx_id = pending.tx_id.as_str(), failure = ?failure, "confirmation failed");
            classify(&failure, &digest)
        }
    };
    (Some(digest), outcome)
}
