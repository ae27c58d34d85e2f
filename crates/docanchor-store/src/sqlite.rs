//! Durable local ledger backed by SQLite.
//!
//! The `records` table's primary key enforces first-writer-wins. As with
//! `MemoryLedger`, submission only pre-checks and the insert happens at
//! confirmation, so concurrent submissions for one digest resolve at the
//! constraint.
//!
//! Every statement issued through `LedgerClient` runs on tokio's blocking
//! pool; the connection mutex is never held by an async worker.

#![allow(clippy::result_large_err)]

use crate::db;
use crate::errors::{duplicate_record, from_rusqlite, storage_failure, Result};
use crate::migrations::apply_migrations;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use docanchor_core::errors::{ExError, ExErrorKind};
use docanchor_core::{
    Commitment, Digest, Identity, LedgerClient, LedgerFailure, LedgerResult, PendingRecord,
    RecordLookup, Session,
};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

/// SQLite-backed Ledger Client
pub struct SqliteLedger {
    conn: Arc<Mutex<Connection>>,
    identity: Option<Identity>,
}

impl SqliteLedger {
    /// Open (creating if needed) a ledger database and apply migrations
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut conn = db::open(path)?;
        db::configure(&conn)?;
        apply_migrations(&mut conn)?;
        Ok(Self::from_connection(conn))
    }

    /// Open a throwaway in-memory ledger
    pub fn open_in_memory() -> Result<Self> {
        let mut conn = db::open_in_memory()?;
        apply_migrations(&mut conn)?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
            identity: None,
        }
    }

    /// Identity returned by `connect`
    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Number of committed records
    pub fn record_count(&self) -> Result<u64> {
        let conn = lock(&self.conn)?;
        conn.query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))
            .map_err(from_rusqlite)
    }

    /// Run `f` against the connection on the blocking pool.
    async fn with_conn<T, F>(&self, op: &'static str, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = lock(&conn)?;
            f(&guard)
        })
            .await
            .map_err(|e| {
                ExError::new(ExErrorKind::Internal)
                    .with_op(op)
                    .with_message(e.to_string())
            })?
    }
}

fn lock(conn: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>> {
    conn.lock().map_err(|_| {
        ExError::new(ExErrorKind::Internal)
            .with_op("sqlite_lock")
            .with_message("ledger connection lock poisoned")
    })
}

fn exists(conn: &Connection, digest: &Digest) -> Result<bool> {
    conn.query_row(
        "SELECT 1 FROM records WHERE digest = ?1",
        [digest.as_str()],
        |_| Ok(()),
    )
    .optional()
    .map(|row| row.is_some())
    .map_err(from_rusqlite)
}

fn owner_of(conn: &Connection, digest: &Digest) -> Result<Option<Identity>> {
    let owner: Option<String> = conn
        .query_row(
            "SELECT owner FROM records WHERE digest = ?1",
            [digest.as_str()],
            |row| row.get(0),
        )
        .optional()
        .map_err(from_rusqlite)?;
    owner
        .map(|o| Identity::parse(&o))
        .transpose()
        .map_err(|e| ExError::from(e).with_op("sqlite_lookup").with_digest(digest.as_str()))
}

/// Insert a committed record. `Ok(false)` means the digest already had an
/// owner.
fn insert(conn: &Connection, pending: &PendingRecord, recorded_at_ms: i64) -> Result<bool> {
    match conn.execute(
        "INSERT INTO records (digest, owner, tx_id, recorded_at) VALUES (?1, ?2, ?3, ?4)",
        params![
            pending.digest.as_str(),
            pending.owner.as_str(),
            pending.tx_id,
            recorded_at_ms
        ],
    ) {
        Ok(_) => Ok(true),
        Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
            Ok(false)
        }
        Err(e) => Err(from_rusqlite(e)),
    }
}

#[async_trait]
impl LedgerClient for SqliteLedger {
    async fn connect(&self) -> LedgerResult<Session> {
        match &self.identity {
            Some(identity) => Ok(Session::new(identity.clone())),
            None => Err(LedgerFailure::new(
                "no identity configured for the local ledger",
            )),
        }
    }

    async fn submit_record(
        &self,
        session: &Session,
        digest: &Digest,
    ) -> LedgerResult<PendingRecord> {
        let key = digest.clone();
        let recorded = self
            .with_conn("record_submit", move |conn| exists(conn, &key))
            .await
            .map_err(|e| storage_failure("record_submit", &e))?;
        if recorded {
            return Err(duplicate_record(digest));
        }
        Ok(PendingRecord {
            tx_id: format!("0x{}", uuid::Uuid::new_v4().simple()),
            digest: digest.clone(),
            owner: session.identity().clone(),
        })
    }

    async fn await_commitment(&self, pending: &PendingRecord) -> LedgerResult<Commitment> {
        let recorded_at_ms = Utc::now().timestamp_millis();
        let record = pending.clone();
        let inserted = self
            .with_conn("record_commit", move |conn| {
                insert(conn, &record, recorded_at_ms)
            })
            .await
            .map_err(|e| storage_failure("record_commit", &e))?;
        if !inserted {
            return Err(duplicate_record(&pending.digest));
        }
        tracing::debug!(digest = %pending.digest, tx_id = %pending.tx_id, "sqlite ledger committed record");

        Ok(Commitment {
            tx_id: pending.tx_id.clone(),
            confirmed_at: Utc.timestamp_millis_opt(recorded_at_ms).single(),
        })
    }

    async fn lookup_record(&self, digest: &Digest) -> LedgerResult<RecordLookup> {
        let key = digest.clone();
        let owner = self
            .with_conn("record_lookup", move |conn| owner_of(conn, &key))
            .await
            .map_err(|e| storage_failure("record_lookup", &e))?;
        Ok(match owner {
            Some(owner) => RecordLookup::found(owner),
            None => RecordLookup::not_found(),
        })
    }
}
