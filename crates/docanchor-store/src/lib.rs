//! DocAnchor Store - Ledger Client implementations
//!
//! Provides:
//! - `MemoryLedger`: in-process ledger with failure switches for tests
//! - `SqliteLedger`: durable local ledger with embedded migrations
//! - `HttpLedgerClient`: client for a remote ledger gateway

pub mod db;
pub mod errors;
pub mod http;
pub mod memory;
pub mod migrations;
pub mod sqlite;

// Re-export key types
pub use errors::Result;
pub use http::{HttpLedgerClient, HttpLedgerConfig};
pub use memory::MemoryLedger;
pub use sqlite::SqliteLedger;
