//! Structured logging components for FaceGate.
//!
//! Handles subscriber setup (console plus optional NDJSON file rotation) and
//! scrubbing of secrets from strings before they are logged.

pub mod logger;
pub mod redact;

pub use logger::{bootstrap_logger, init_logger};
pub use redact::redact_sensitive_data;
