//! Payloads exchanged with callers and with the URL arbiter.
//!
//! The gateway never persists these; they exist only for the lifetime of
//! a single request.

pub mod arbiter;
pub mod content_item;
