//! Core types shared across docanchor facilities
//!
//! This crate provides foundational types used by the error, logging and
//! workflow layers:
//!
//! - **Correlation types**: RequestId, SessionId, RequestContext
//! - **Sensitive data**: Sensitive<T> marker for automatic redaction
//! - **Schema constants**: Canonical event names

pub mod correlation;
pub mod schema;
pub mod sensitive;

pub use correlation::{RequestContext, RequestId, SessionId};
pub use sensitive::Sensitive;
