//! Logging setup and helpers to correlate log lines of one logical request.
pub mod request_id;
pub mod tracing;
