//! Terminal result of one workflow invocation.

use crate::digest::Digest;
use crate::errors::{ExError, ExErrorKind};
use crate::ledger::{Commitment, Identity};
use serde::Serialize;

/// Closed set of results a workflow can terminate in.
///
/// Created once per invocation and handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// Issuance committed, or verification found a matching record.
    Success {
        digest: Digest,
        owner: Option<Identity>,
        commitment: Option<Commitment>,
    },
    /// Verification query succeeded but no record exists for the digest.
    NotFound { digest: Digest },
    /// The ledger already holds a record for this digest.
    DuplicateRejected { digest: Digest },
    /// The acting identity declined to authorize.
    UserCancelled,
    /// The ledger rejected execution for another reason.
    ///
    /// `reason` is bounded for display; `diagnostic` keeps the full text.
    RevertedOther { reason: String, diagnostic: String },
    /// The ledger could not be reached or answered unintelligibly.
    ConnectivityFailure { detail: String },
    /// The document could not be fully read.
    IoFailure { detail: String },
}

impl Outcome {
    /// Stable code for logs, CLI output and tests.
    pub fn code(&self) -> &'static str {
        match self {
            Outcome::Success { .. } => "OK",
            Outcome::NotFound { .. } => ExErrorKind::NotFound.code(),
            Outcome::DuplicateRejected { .. } => ExErrorKind::DuplicateRecord.code(),
            Outcome::UserCancelled => ExErrorKind::UserCancelled.code(),
            Outcome::RevertedOther { .. } => ExErrorKind::Reverted.code(),
            Outcome::ConnectivityFailure { .. } => ExErrorKind::Connectivity.code(),
            Outcome::IoFailure { .. } => ExErrorKind::Io.code(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    /// Business outcomes that are not faults: they are logged as plain
    /// `end` events rather than `end_error`.
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Outcome::Success { .. }
                | Outcome::NotFound { .. }
                | Outcome::DuplicateRejected { .. }
                | Outcome::UserCancelled
        )
    }

    pub fn digest(&self) -> Option<&Digest> {
        match self {
            Outcome::Success { digest, .. }
            | Outcome::NotFound { digest }
            | Outcome::DuplicateRejected { digest } => Some(digest),
            _ => None,
        }
    }

    /// Structured error for fault outcomes; `None` for expected ones.
    pub fn to_error(&self) -> Option<ExError> {
        match self {
            Outcome::RevertedOther { diagnostic, .. } => {
                Some(ExError::new(ExErrorKind::Reverted).with_message(diagnostic.clone()))
            }
            Outcome::ConnectivityFailure { detail } => {
                Some(ExError::new(ExErrorKind::Connectivity).with_message(detail.clone()))
            }
            Outcome::IoFailure { detail } => {
                Some(ExError::new(ExErrorKind::Io).with_message(detail.clone()))
            }
            _ => None,
        }
    }

    /// One-line human summary.
    pub fn summary(&self) -> String {
        match self {
            Outcome::Success {
                digest,
                owner,
                commitment,
            } => match (owner, commitment) {
                (_, Some(c)) => format!("Recorded {} (tx {})", digest, c.tx_id),
                (Some(o), None) => format!("Verified authentic: {} issued by {}", digest, o),
                (None, None) => format!("Success: {}", digest),
            },
            Outcome::NotFound { digest } => format!(
                "Verification failed: no record for {}; the document is unknown or was altered",
                digest
            ),
            Outcome::DuplicateRejected { digest } => {
                format!("Already recorded: {} exists on the ledger", digest)
            }
            Outcome::UserCancelled => "Cancelled: the identity declined to sign".to_string(),
            Outcome::RevertedOther { reason, .. } => format!("Rejected by the ledger: {}", reason),
            Outcome::ConnectivityFailure { detail } => format!("Ledger unreachable: {}", detail),
            Outcome::IoFailure { detail } => format!("Could not read document: {}", detail),
        }
    }
}
