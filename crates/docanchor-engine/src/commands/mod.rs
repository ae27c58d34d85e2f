//! Workflow orchestration layer.
//!
//! Each workflow logs one `start` and one terminal event. Expected business
//! results (`NotFound`, `DuplicateRejected`, `UserCancelled`) end with a plain
//! `end` event; faults end with `end_error` carrying the full diagnostic.

pub mod engine_command;
pub mod issue;
pub mod verify;

use docanchor_core::core_types::RequestContext;
use docanchor_core::{log_op_end, log_op_error, Digest, Outcome};
use std::time::Instant;

pub(crate) fn log_outcome(
    op: &'static str,
    ctx: &RequestContext,
    digest: Option<&Digest>,
    outcome: &Outcome,
    start: Instant,
) {
    let duration_ms = start.elapsed().as_millis() as u64;
    let request_id = ctx.request_id.as_str();
    let code = outcome.code();

    match (outcome.to_error(), digest) {
        (None, Some(digest)) => log_op_end!(
            op,
            duration_ms = duration_ms,
            request_id = request_id,
            digest = digest.as_str(),
            outcome = code
        ),
        (None, None) => log_op_end!(
            op,
            duration_ms = duration_ms,
            request_id = request_id,
            outcome = code
        ),
        (Some(err), Some(digest)) => log_op_error!(
            op,
            err.with_op(op).with_digest(digest.as_str()),
            duration_ms = duration_ms,
            request_id = request_id,
            digest = digest.as_str(),
            outcome = code
        ),
        (Some(err), None) => log_op_error!(
            op,
            err.with_op(op),
            duration_ms = duration_ms,
            request_id = request_id,
            outcome = code
        ),
    }
}
