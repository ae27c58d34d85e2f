//! docanchor core - digest anchoring protocol
//!
//! This crate provides the pieces shared by issuance and verification:
//! - Digest engine (SHA-256 over the full document byte stream)
//! - Ledger schema and the async `LedgerClient` boundary
//! - Explicit `Session` for the acting identity
//! - `Outcome` taxonomy and the classifier that produces it from raw
//!   ledger failures
//! - Error and logging facilities

pub mod classifier;
pub mod digest;
pub mod errors;
pub mod ledger;
pub mod logging_facility;
pub mod outcome;
pub mod session;

pub use docanchor_core_types as core_types;

// Re-export commonly used types
pub use classifier::{classify, classify_lookup, DUPLICATE_RECORD_MARKER};
pub use digest::{compute_digest_bytes, Digest, Document};
pub use errors::{AnchorError, ExError, ExErrorKind, Result};
pub use ledger::{
    Commitment, FailureCode, Identity, LedgerClient, LedgerFailure, LedgerResult, PendingRecord,
    Record, RecordLookup,
};
pub use outcome::Outcome;
pub use session::Session;
