//! Ledger schema and the Ledger Client boundary.
//!
//! The ledger holds one table: `digest (unique) -> owner`. It is written
//! through `submit_record` + `await_commitment` and read through
//! `lookup_record`. First writer wins; the ledger enforces that, clients
//! only observe the rejection.
//!
//! Implementations live outside this crate (in-memory, SQLite, remote
//! gateway). Every failure they report is a `LedgerFailure`, a deliberately
//! loose, provider-shaped value that the classifier turns into an
//! `Outcome`.

use crate::digest::Digest;
use crate::errors::{AnchorError, Result};
use crate::session::Session;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result type for Ledger Client operations
pub type LedgerResult<T> = std::result::Result<T, LedgerFailure>;

/// Account identifier of an issuer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity(String);

impl Identity {
    /// # Errors
    ///
    /// Returns `AnchorError::InvalidIdentity` for empty values or values
    /// containing whitespace.
    pub fn parse(value: &str) -> Result<Self> {
        if value.is_empty() || value.chars().any(char::is_whitespace) {
            return Err(AnchorError::InvalidIdentity {
                value: value.to_string(),
            });
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Identity {
    type Error = AnchorError;

    fn try_from(value: String) -> Result<Self> {
        Identity::parse(&value)
    }
}

impl From<Identity> for String {
    fn from(identity: Identity) -> Self {
        identity.0
    }
}

/// A ledger entry: one digest, one owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub digest: Digest,
    pub owner: Identity,
}

/// A submission the acting identity has authorized but the ledger has not
/// yet confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRecord {
    pub tx_id: String,
    pub digest: Digest,
    pub owner: Identity,
}

/// Proof that a record submission was durably accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commitment {
    pub tx_id: String,
    pub confirmed_at: Option<DateTime<Utc>>,
}

/// Answer to a read-only lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordLookup {
    pub found: bool,
    pub owner: Option<Identity>,
}

impl RecordLookup {
    pub fn found(owner: Identity) -> Self {
        Self {
            found: true,
            owner: Some(owner),
        }
    }

    pub fn not_found() -> Self {
        Self {
            found: false,
            owner: None,
        }
    }
}

/// Structured failure codes a Ledger Client may attach.
///
/// When present they take precedence over text heuristics in the
/// classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCode {
    UserRejected,
    DuplicateRecord,
    Reverted,
    Unreachable,
    Timeout,
}

/// Provider error code: numeric (JSON-RPC style) or symbolic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProviderCode {
    Numeric(i64),
    Named(String),
}

/// Nested `data` object some providers attach to an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureData {
    #[serde(default)]
    pub message: Option<String>,
}

/// Raw failure reported by a Ledger Client.
///
/// Mirrors the nested shapes providers emit (`code`, `reason`,
/// `data.message`, `error.message`, `message`). Nothing downstream of the
/// classifier inspects these fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerFailure {
    #[serde(default)]
    pub code: Option<ProviderCode>,
    #[serde(default)]
    pub error_code: Option<FailureCode>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub data: Option<FailureData>,
    #[serde(default)]
    pub error: Option<Box<LedgerFailure>>,
    #[serde(default)]
    pub message: String,
}

impl LedgerFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// The transport could not reach the ledger.
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::new(message).with_error_code(FailureCode::Unreachable)
    }

    /// The acting identity declined to authorize.
    pub fn user_rejected() -> Self {
        Self::new("user rejected the request")
            .with_code(ProviderCode::Numeric(4001))
            .with_error_code(FailureCode::UserRejected)
    }

    /// The ledger refused to execute, with a reason string.
    pub fn reverted(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self::new(format!("execution reverted: {}", reason)).with_reason(reason)
    }

    pub fn with_code(mut self, code: ProviderCode) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_error_code(mut self, code: FailureCode) -> Self {
        self.error_code = Some(code);
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn with_data_message(mut self, message: impl Into<String>) -> Self {
        self.data = Some(FailureData {
            message: Some(message.into()),
        });
        self
    }

    pub fn with_inner(mut self, inner: LedgerFailure) -> Self {
        self.error = Some(Box::new(inner));
        self
    }
}

impl std::fmt::Display for LedgerFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.message.is_empty() {
            if let Some(reason) = &self.reason {
                return f.write_str(reason);
            }
            return f.write_str("ledger failure");
        }
        f.write_str(&self.message)
    }
}

impl std::error::Error for LedgerFailure {}

/// Ledger Client boundary.
///
/// Implementations must be safe to share across concurrent workflow
/// invocations. Together, `submit_record` and `await_commitment` form the
/// mutating `record(digest) -> commitment` operation; `lookup_record` is
/// read-only and never requires authorization.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Establish the acting identity for subsequent submissions.
    async fn connect(&self) -> LedgerResult<Session>;

    /// Ask the session's identity to authorize a record for `digest`.
    ///
    /// Resolves once the submission is signed and broadcast.
    async fn submit_record(&self, session: &Session, digest: &Digest)
        -> LedgerResult<PendingRecord>;

    /// Wait until the ledger durably accepts (or rejects) a submission.
    async fn await_commitment(&self, pending: &PendingRecord) -> LedgerResult<Commitment>;

    /// Look up the owner of `digest`, if recorded.
    async fn lookup_record(&self, digest: &Digest) -> LedgerResult<RecordLookup>;
}
