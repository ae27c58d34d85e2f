//! In-process ledger.
//!
//! Holds the digest -> owner table in a `RwLock<HashMap>`. Submission
//! authorizes and hands out a transaction id; the insert happens at
//! confirmation, so two racing submissions for one digest both pass the
//! authorization check and the loser is rejected when it commits.
//!
//! Failure switches let tests drive every classifier path.

use crate::errors::duplicate_record;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use docanchor_core::{
    Commitment, Digest, Identity, LedgerClient, LedgerFailure, LedgerResult, PendingRecord,
    RecordLookup, Session,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::RwLock;

#[derive(Debug, Clone)]
struct StoredRecord {
    owner: Identity,
    tx_id: String,
    recorded_at: DateTime<Utc>,
}

/// In-process Ledger Client
pub struct MemoryLedger {
    records: RwLock<HashMap<Digest, StoredRecord>>,
    identity: Option<Identity>,
    tx_counter: AtomicU64,
    submissions: AtomicU64,
    /// Every call fails as if the ledger were unreachable
    fail_mode: AtomicBool,
    /// The acting identity declines every authorization
    decline_mode: AtomicBool,
    /// Confirmation reverts with this failure
    revert_with: RwLock<Option<LedgerFailure>>,
}

impl MemoryLedger {
    /// Create an empty ledger with no connectable identity
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            identity: None,
            tx_counter: AtomicU64::new(1),
            submissions: AtomicU64::new(0),
            fail_mode: AtomicBool::new(false),
            decline_mode: AtomicBool::new(false),
            revert_with: RwLock::new(None),
        }
    }

    /// Identity returned by `connect`
    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Simulate an unreachable ledger
    pub fn set_fail_mode(&self, fail: bool) {
        self.fail_mode.store(fail, Ordering::SeqCst);
    }

    /// Simulate the identity declining to sign
    pub fn set_decline_mode(&self, decline: bool) {
        self.decline_mode.store(decline, Ordering::SeqCst);
    }

    /// Make confirmations revert with `failure` (or stop doing so)
    pub fn set_revert_with(&self, failure: Option<LedgerFailure>) {
        if let Ok(mut slot) = self.revert_with.write() {
            *slot = failure;
        }
    }

    /// Number of submissions that reached the ledger
    pub fn submission_count(&self) -> u64 {
        self.submissions.load(Ordering::SeqCst)
    }

    /// Number of committed records
    pub fn record_count(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    /// Transaction id and commit time for a recorded digest
    pub fn commitment_for(&self, digest: &Digest) -> Option<Commitment> {
        let records = self.records.read().ok()?;
        records.get(digest).map(|stored| Commitment {
            tx_id: stored.tx_id.clone(),
            confirmed_at: Some(stored.recorded_at),
        })
    }

    fn check_reachable(&self) -> LedgerResult<()> {
        if self.fail_mode.load(Ordering::SeqCst) {
            return Err(LedgerFailure::unreachable(
                "could not detect network (event=\"noNetwork\")",
            ));
        }
        Ok(())
    }

    fn contains(&self, digest: &Digest) -> LedgerResult<bool> {
        self.records
            .read()
            .map(|records| records.contains_key(digest))
            .map_err(|_| poisoned())
    }
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> LedgerFailure {
    LedgerFailure::new("in-memory ledger lock poisoned")
}

#[async_trait]
impl LedgerClient for MemoryLedger {
    async fn connect(&self) -> LedgerResult<Session> {
        self.check_reachable()?;
        match &self.identity {
            Some(identity) => Ok(Session::new(identity.clone())),
            None => Err(LedgerFailure::new("no identity available to connect")),
        }
    }

    async fn submit_record(
        &self,
        session: &Session,
        digest: &Digest,
    ) -> LedgerResult<PendingRecord> {
        self.check_reachable()?;
        if self.decline_mode.load(Ordering::SeqCst) {
            return Err(LedgerFailure::user_rejected());
        }
        self.submissions.fetch_add(1, Ordering::SeqCst);

        // Gas estimation sees committed state only
        if self.contains(digest)? {
            return Err(duplicate_record(digest));
        }

        let n = self.tx_counter.fetch_add(1, Ordering::SeqCst);
        Ok(PendingRecord {
            tx_id: format!("0x{:064x}", n),
            digest: digest.clone(),
            owner: session.identity().clone(),
        })
    }

    async fn await_commitment(&self, pending: &PendingRecord) -> LedgerResult<Commitment> {
        // Block inclusion happens after other submissions get a chance to run
        tokio::task::yield_now().await;
        self.check_reachable()?;

        if let Some(failure) = self.revert_with.read().map_err(|_| poisoned())?.clone() {
            return Err(failure);
        }

        let mut records = self.records.write().map_err(|_| poisoned())?;
        if records.contains_key(&pending.digest) {
            return Err(duplicate_record(&pending.digest));
        }
        let recorded_at = Utc::now();
        records.insert(
            pending.digest.clone(),
            StoredRecord {
                owner: pending.owner.clone(),
                tx_id: pending.tx_id.clone(),
                recorded_at,
            },
        );
        tracing::debug!(digest = %pending.digest, tx_id = %pending.tx_id, "memory ledger committed record");

        Ok(Commitment {
            tx_id: pending.tx_id.clone(),
            confirmed_at: Some(recorded_at),
        })
    }

    async fn lookup_record(&self, digest: &Digest) -> LedgerResult<RecordLookup> {
        self.check_reachable()?;
        let records = self.records.read().map_err(|_| poisoned())?;
        Ok(match records.get(digest) {
            Some(stored) => RecordLookup::found(stored.owner.clone()),
            None => RecordLookup::not_found(),
        })
    }
}
