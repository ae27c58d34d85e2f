//! Error handling for docanchor-store
//!
//! Wraps docanchor-core ExError with store-specific helpers, plus the
//! `LedgerFailure` shapes the local backends report.

use docanchor_core::errors::{ExError, ExErrorKind};
use docanchor_core::{Digest, FailureCode, LedgerFailure};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Revert reason local backends report when a digest is already recorded.
pub const DUPLICATE_REVERT_REASON: &str = "Error: document already recorded";

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("migration")
        .with_message(format!("Migration {} failed: {}", migration_id, reason))
}

/// Create a checksum mismatch error
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("migration_checksum")
        .with_message(format!(
            "Checksum mismatch for migration {}: expected {}, got {}",
            migration_id, expected, actual
        ))
}

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create an error for an HTTP client that could not be built
pub fn http_client_error(err: reqwest::Error) -> ExError {
    ExError::new(ExErrorKind::Config)
        .with_op("http_client")
        .with_message(format!("failed to build ledger gateway client: {}", err))
}

/// Ledger rejection for a digest that already has an owner.
///
/// Carries both the structured code and the marker text, so it classifies
/// as a duplicate either way.
pub fn duplicate_record(digest: &Digest) -> LedgerFailure {
    LedgerFailure::reverted(DUPLICATE_REVERT_REASON)
        .with_error_code(FailureCode::DuplicateRecord)
        .with_data_message(format!(
            "execution reverted: {} ({})",
            DUPLICATE_REVERT_REASON,
            digest.short(10)
        ))
}

/// Storage fault surfaced through the ledger boundary.
pub fn storage_failure(op: &str, err: &ExError) -> LedgerFailure {
    LedgerFailure::unreachable(format!("ledger storage failed during {}: {}", op, err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use docanchor_core::compute_digest_bytes;

    #[test]
    fn test_migration_error_is_persistence() {
        let err = migration_error("001_records", "syntax error");
        assert_eq!(err.kind(), ExErrorKind::Persistence);
        assert!(err.message().contains("001_records"));
    }

    #[test]
    fn test_duplicate_record_carries_code_and_marker() {
        let failure = duplicate_record(&compute_digest_bytes(b"hello"));
        assert_eq!(failure.error_code, Some(FailureCode::DuplicateRecord));
        assert!(failure
            .reason
            .as_deref()
            .is_some_and(|r| r.contains(docanchor_core::DUPLICATE_RECORD_MARKER)));
    }
}
