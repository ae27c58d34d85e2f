use thiserror::Error;

/// Result type alias using AnchorError
pub type Result<T> = std::result::Result<T, AnchorError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code used in log events, CLI output and
/// tests. Workflow outcomes that are failures map onto the same codes (see
/// `Outcome::code`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Input
    InvalidInput,
    InvalidDigest,
    InvalidIdentity,

    // Ledger outcomes
    NotFound,
    DuplicateRecord,
    UserCancelled,
    Reverted,
    Connectivity,

    // Integration/IO
    Io,
    Serialization,
    Persistence,
    Config,
    Timeout,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidDigest => "ERR_INVALID_DIGEST",
            ExErrorKind::InvalidIdentity => "ERR_INVALID_IDENTITY",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::DuplicateRecord => "ERR_DUPLICATE_RECORD",
            ExErrorKind::UserCancelled => "ERR_USER_CANCELLED",
            ExErrorKind::Reverted => "ERR_REVERTED",
            ExErrorKind::Connectivity => "ERR_CONNECTIVITY",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::Timeout => "ERR_TIMEOUT",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification kind for programmatic handling plus operation
/// and digest context for diagnostics.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    digest: Option<String>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            digest: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add digest context
    pub fn with_digest(mut self, digest: impl Into<String>) -> Self {
        self.digest = Some(digest.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn digest(&self) -> Option<&str> {
        self.digest.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(digest) = &self.digest {
            write!(f, " (digest: {})", digest)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for fallible docanchor library calls
///
/// Ledger-side failures are not represented here: they travel as
/// `LedgerFailure` and are normalised into an `Outcome` by the classifier.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnchorError {
    /// The document byte stream could not be fully read
    #[error("Failed to read document: {message}")]
    Io { message: String },

    /// A digest string is not 64 hexadecimal characters
    #[error("Invalid digest '{value}': {reason}")]
    InvalidDigest { value: String, reason: String },

    /// An identity string is empty or contains whitespace
    #[error("Invalid identity '{value}'")]
    InvalidIdentity { value: String },

    /// Configuration could not be loaded or is inconsistent
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl From<AnchorError> for ExError {
    fn from(err: AnchorError) -> Self {
        match err {
            AnchorError::Io { message } => ExError::new(ExErrorKind::Io).with_message(message),
            AnchorError::InvalidDigest { value, reason } => {
                ExError::new(ExErrorKind::InvalidDigest)
                    .with_digest(value)
                    .with_message(reason)
            }
            AnchorError::InvalidIdentity { value } => ExError::new(ExErrorKind::InvalidIdentity)
                .with_message(format!("Invalid identity '{}'", value)),
            AnchorError::Config { message } => {
                ExError::new(ExErrorKind::Config).with_message(message)
            }
            AnchorError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}

impl From<std::io::Error> for AnchorError {
    fn from(err: std::io::Error) -> Self {
        AnchorError::Io {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for AnchorError {
    fn from(err: serde_json::Error) -> Self {
        AnchorError::Serialization {
            message: err.to_string(),
        }
    }
}
