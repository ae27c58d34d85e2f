//! Connected-identity session.
//!
//! A `Session` is created by `LedgerClient::connect` (or directly, for
//! backends that are configured with an identity) and passed explicitly
//! into each issuance. Dropping it is the disconnect; nothing caches it.

use crate::ledger::Identity;
use chrono::{DateTime, Utc};
use docanchor_core_types::SessionId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    id: SessionId,
    identity: Identity,
    connected_at: DateTime<Utc>,
}

impl Session {
    pub fn new(identity: Identity) -> Self {
        Self {
            id: SessionId::new(),
            identity,
            connected_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// The identity that authorizes submissions made with this session.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn connected_at(&self) -> DateTime<Utc> {
        self.connected_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sessions_for_same_identity_are_distinct() {
        let identity = Identity::parse("issuer-a").unwrap();
        let s1 = Session::new(identity.clone());
        let s2 = Session::new(identity);
        assert_ne!(s1.id(), s2.id());
        assert_eq!(s1.identity(), s2.identity());
    }
}
