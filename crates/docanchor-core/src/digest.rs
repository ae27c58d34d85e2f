//! Digest engine: SHA-256 content digests of documents.
//!
//! The digest is the only thing that ever leaves the process; document bytes
//! are hashed locally and discarded.
//!
//! ## Determinism Guarantees
//!
//! - Same bytes → same digest
//! - Order-sensitive over the full byte sequence (no truncation, no sampling)
//! - Readers are consumed to EOF in fixed-size chunks, so large files never
//!   need to reside in memory

use crate::errors::{AnchorError, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};
use std::io::Read;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncRead, AsyncReadExt};

/// Length of a hex-encoded SHA-256 digest
pub const DIGEST_HEX_LEN: usize = 64;

const READ_CHUNK_SIZE: usize = 64 * 1024;

/// Hex-encoded SHA-256 digest of a document.
///
/// Always 64 lowercase hexadecimal characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Digest(String);

impl Digest {
    /// Parse and validate a hex digest.
    ///
    /// Upper-case hex is accepted and normalised to lower-case.
    ///
    /// # Errors
    ///
    /// Returns `AnchorError::InvalidDigest` if the value is not exactly 64
    /// hexadecimal characters.
    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        if trimmed.len() != DIGEST_HEX_LEN {
            return Err(AnchorError::InvalidDigest {
                value: value.to_string(),
                reason: format!(
                    "expected {} hex characters, got {}",
                    DIGEST_HEX_LEN,
                    trimmed.len()
                ),
            });
        }
        if !trimmed.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(AnchorError::InvalidDigest {
                value: value.to_string(),
                reason: "contains non-hexadecimal characters".to_string(),
            });
        }
        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    fn from_hasher(hasher: Sha256) -> Self {
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Leading characters for progress displays (`2cf24dba5f…`).
    pub fn short(&self, len: usize) -> &str {
        &self.0[..len.min(DIGEST_HEX_LEN)]
    }
}

impl std::fmt::Display for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Digest {
    type Error = AnchorError;

    fn try_from(value: String) -> Result<Self> {
        Digest::parse(&value)
    }
}

impl From<Digest> for String {
    fn from(digest: Digest) -> Self {
        digest.0
    }
}

/// Compute the digest of an in-memory byte slice.
pub fn compute_digest_bytes(bytes: &[u8]) -> Digest {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    Digest::from_hasher(hasher)
}

/// Compute the digest of a blocking reader, consuming it to EOF.
///
/// # Errors
///
/// Returns `AnchorError::Io` if the reader fails before EOF.
pub fn compute_digest_reader<R: Read>(mut reader: R) -> Result<Digest> {
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; READ_CHUNK_SIZE];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        hasher.update(&buf[..n]);
    }
    Ok(Digest::from_hasher(hasher))
}

/// Compute the digest of an async reader, consuming it to EOF.
///
/// # Errors
///
/// Returns `AnchorError::Io` if the reader fails before EOF.
pub async fn compute_digest_async<R: AsyncRead + Unpin>(mut reader: R) -> Result<Digest> {
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; READ_CHUNK_SIZE];
    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(Digest::from_hasher(hasher))
}

/// A document supplied by the caller for one digest computation.
///
/// Never persisted; only its digest is used afterwards.
#[derive(Debug, Clone)]
pub enum Document {
    /// Bytes already held in memory
    Bytes(Vec<u8>),
    /// A file read incrementally from disk
    File(PathBuf),
}

impl Document {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Document::Bytes(bytes.into())
    }

    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Document::File(path.as_ref().to_path_buf())
    }

    /// Short human label for logs (never the content).
    pub fn label(&self) -> String {
        match self {
            Document::Bytes(bytes) => format!("<{} bytes>", bytes.len()),
            Document::File(path) => path.display().to_string(),
        }
    }

    /// Compute this document's digest.
    ///
    /// # Errors
    ///
    /// Returns `AnchorError::Io` if the file cannot be opened or fully read.
    pub async fn digest(&self) -> Result<Digest> {
        match self {
            Document::Bytes(bytes) => Ok(compute_digest_bytes(bytes)),
            Document::File(path) => {
                let file = tokio::fs::File::open(path).await.map_err(|e| AnchorError::Io {
                    message: format!("{}: {}", path.display(), e),
                })?;
                compute_digest_async(file).await.map_err(|e| match e {
                    AnchorError::Io { message } => AnchorError::Io {
                        message: format!("{}: {}", path.display(), message),
                    },
                    other => other,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HELLO_SHA256: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

    #[test]
    fn test_hello_vector() {
        assert_eq!(compute_digest_bytes(b"hello").as_str(), HELLO_SHA256);
    }

    #[test]
    fn test_reader_matches_bytes_across_chunk_boundary() {
        let data: Vec<u8> = (0..(READ_CHUNK_SIZE * 2 + 17))
            .map(|i| (i % 251) as u8)
            .collect();
        let from_reader = compute_digest_reader(std::io::Cursor::new(&data)).unwrap();
        assert_eq!(from_reader, compute_digest_bytes(&data));
    }

    #[test]
    fn test_parse_normalises_case() {
        let upper = HELLO_SHA256.to_ascii_uppercase();
        let digest = Digest::parse(&upper).unwrap();
        assert_eq!(digest.as_str(), HELLO_SHA256);
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        let err = Digest::parse("abc").unwrap_err();
        assert!(matches!(err, AnchorError::InvalidDigest { .. }));
    }

    #[test]
    fn test_parse_rejects_non_hex() {
        let bad = "z".repeat(DIGEST_HEX_LEN);
        assert!(Digest::parse(&bad).is_err());
    }

    #[test]
    fn test_short_prefix() {
        let digest = compute_digest_bytes(b"hello");
        assert_eq!(digest.short(10), "2cf24dba5f");
        assert_eq!(digest.short(500), HELLO_SHA256);
    }

    #[test]
    fn test_serde_rejects_invalid_digest() {
        let result: std::result::Result<Digest, _> = serde_json::from_str("\"not-a-digest\"");
        assert!(result.is_err());
    }
}
