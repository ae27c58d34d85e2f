//! DocAnchor Engine - Issuance and Verification workflows
//!
//! Drives a document through digest computation and the Ledger Client,
//! reporting progress along the way, and always terminates in exactly one
//! `Outcome`.

pub mod commands;
pub mod progress;

pub use commands::engine_command::{apply_engine_command, EngineCommand};
pub use commands::issue::issue_document;
pub use commands::verify::{verify_digest, verify_document};
pub use progress::{ChannelProgress, NoopProgress, ProgressEvent, ProgressSink, WorkflowState};
