//! Outcome classifier.
//!
//! The single place that inspects raw `LedgerFailure` shapes. Everything
//! downstream matches on `Outcome` only.
//!
//! ## Precedence (first match wins)
//!
//! 1. Cancellation signal anywhere in the failure → `UserCancelled`
//! 2. Structured `DuplicateRecord` code, or a structured reason containing
//!    [`DUPLICATE_RECORD_MARKER`] → `DuplicateRejected`
//! 3. Any other structured reason → `RevertedOther(reason)`
//! 4. No reason, but the text says execution reverted →
//!    `RevertedOther(NO_SPECIFIC_REASON)`
//! 5. Everything else → `ConnectivityFailure`
//!
//! Read-only lookups go through [`classify_lookup`] instead: a query has no
//! authorization or execution step, so every failure is connectivity.
//!
//! A structured reason is searched for in this order: `reason`,
//! `data.message`, the nested `error` (its reason, data or message), then a
//! reason embedded in a revert message (`... 'reason'` or
//! `execution reverted: reason`).

use crate::digest::Digest;
use crate::ledger::{FailureCode, LedgerFailure, ProviderCode};
use crate::outcome::Outcome;

/// Substring that marks a duplicate-record rejection in a reason string.
///
/// Matched case-sensitively. Ledger clients that can report
/// `FailureCode::DuplicateRecord` bypass this text match entirely.
pub const DUPLICATE_RECORD_MARKER: &str = "already recorded";

/// JSON-RPC code wallets use when the user rejects a request (EIP-1193).
pub const USER_REJECTED_PROVIDER_CODE: i64 = 4001;

/// Symbolic code some providers use for the same rejection.
pub const USER_REJECTED_PROVIDER_NAME: &str = "ACTION_REJECTED";

/// Maximum characters of reason/detail text kept for display.
pub const DISPLAY_TEXT_LEN: usize = 80;

/// Display reason used when the ledger reverted without saying why.
pub const NO_SPECIFIC_REASON: &str = "no specific reason provided";

const REVERT_PATTERN: &str = "revert";

const REASON_PREFIXES: [&str; 4] = [
    "execution reverted: ",
    "VM Exception while processing transaction: revert ",
    "reverted with reason string ",
    "Error: ",
];

/// Classify a ledger failure observed while processing `digest`.
pub fn classify(failure: &LedgerFailure, digest: &Digest) -> Outcome {
    if is_cancellation(failure) {
        return Outcome::UserCancelled;
    }

    if has_error_code(failure, FailureCode::DuplicateRecord) {
        return Outcome::DuplicateRejected {
            digest: digest.clone(),
        };
    }

    if let Some(reason) = structured_reason(failure) {
        if reason.contains(DUPLICATE_RECORD_MARKER) {
            return Outcome::DuplicateRejected {
                digest: digest.clone(),
            };
        }
        return Outcome::RevertedOther {
            reason: truncate_for_display(&normalize_reason(&reason)),
            diagnostic: reason,
        };
    }

    if failure.error_code == Some(FailureCode::Reverted)
        || failure.message.to_ascii_lowercase().contains(REVERT_PATTERN)
    {
        return Outcome::RevertedOther {
            reason: NO_SPECIFIC_REASON.to_string(),
            diagnostic: failure.message.clone(),
        };
    }

    Outcome::ConnectivityFailure {
        detail: truncate_for_display(&failure.to_string()),
    }
}

/// Classify a failed read-only lookup.
///
/// Cancellation, duplicate and revert shapes are meaningless for a query
/// and collapse to `ConnectivityFailure`.
pub fn classify_lookup(failure: &LedgerFailure) -> Outcome {
    Outcome::ConnectivityFailure {
        detail: truncate_for_display(&failure.to_string()),
    }
}

/// Whether the failure, at any nesting depth, signals that the acting
/// identity declined.
pub fn is_cancellation(failure: &LedgerFailure) -> bool {
    if failure.error_code == Some(FailureCode::UserRejected) {
        return true;
    }
    let coded = match &failure.code {
        Some(ProviderCode::Numeric(code)) => *code == USER_REJECTED_PROVIDER_CODE,
        Some(ProviderCode::Named(name)) => name == USER_REJECTED_PROVIDER_NAME,
        None => false,
    };
    coded || failure.error.as_deref().is_some_and(is_cancellation)
}

fn has_error_code(failure: &LedgerFailure, code: FailureCode) -> bool {
    failure.error_code == Some(code)
        || failure
            .error
            .as_deref()
            .is_some_and(|inner| has_error_code(inner, code))
}

fn is_transport(failure: &LedgerFailure) -> bool {
    matches!(
        failure.error_code,
        Some(FailureCode::Unreachable) | Some(FailureCode::Timeout)
    )
}

fn non_empty(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

fn structured_reason(failure: &LedgerFailure) -> Option<String> {
    if let Some(reason) = non_empty(failure.reason.as_deref()) {
        return Some(reason);
    }
    if let Some(reason) = non_empty(failure.data.as_ref().and_then(|d| d.message.as_deref())) {
        return Some(reason);
    }
    if let Some(inner) = failure.error.as_deref().filter(|inner| !is_transport(inner)) {
        if let Some(reason) =
            structured_reason(inner).or_else(|| non_empty(Some(inner.message.as_str())))
        {
            return Some(reason);
        }
    }
    embedded_revert_reason(&failure.message)
}

/// Pull a reason out of free text such as
/// `Error: VM Exception while processing transaction: reverted with reason string 'X'`
/// or `execution reverted: X`.
fn embedded_revert_reason(message: &str) -> Option<String> {
    if !message.to_ascii_lowercase().contains(REVERT_PATTERN) {
        return None;
    }
    if let Some(start) = message.find('\'') {
        let rest = &message[start + 1..];
        if let Some(end) = rest.find('\'') {
            if let Some(quoted) = non_empty(Some(&rest[..end])) {
                return Some(quoted);
            }
        }
    }
    ["execution reverted: ", "transaction: revert "]
        .iter()
        .find_map(|marker| {
            message
                .find(marker)
                .and_then(|idx| non_empty(Some(&message[idx + marker.len()..])))
        })
}

/// Strip provider boilerplate so `"Error: insufficient gas"` displays as
/// `"insufficient gas"`.
pub fn normalize_reason(reason: &str) -> String {
    let mut current = reason.trim();
    while let Some(stripped) = REASON_PREFIXES
        .iter()
        .find_map(|prefix| current.strip_prefix(prefix))
    {
        current = stripped.trim_start();
    }
    current.trim().to_string()
}

/// Bound text to [`DISPLAY_TEXT_LEN`] characters.
pub fn truncate_for_display(text: &str) -> String {
    text.chars().take(DISPLAY_TEXT_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_stacked_prefixes() {
        assert_eq!(
            normalize_reason("execution reverted: Error: insufficient gas"),
            "insufficient gas"
        );
        assert_eq!(normalize_reason("  plain reason "), "plain reason");
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        let text = "é".repeat(100);
        assert_eq!(truncate_for_display(&text).chars().count(), DISPLAY_TEXT_LEN);
    }

    #[test]
    fn test_embedded_reason_prefers_quoted_fragment() {
        let msg = "Error: VM Exception while processing transaction: reverted with reason string 'Error: document already recorded'";
        assert_eq!(
            embedded_revert_reason(msg).as_deref(),
            Some("Error: document already recorded")
        );
    }

    #[test]
    fn test_embedded_reason_requires_revert_text() {
        assert_eq!(embedded_revert_reason("connect ECONNREFUSED 'x'"), None);
    }

    #[test]
    fn test_transport_coded_inner_error_is_not_a_reason() {
        let failure = LedgerFailure::new("request failed")
            .with_inner(LedgerFailure::unreachable("connection refused"));
        assert_eq!(structured_reason(&failure), None);
    }
}
