//! Canonical event names for structured logging
//!
//! Every workflow emits exactly one `start` event and one terminal event.

pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
