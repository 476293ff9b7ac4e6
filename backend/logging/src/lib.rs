//! Structured logging for SlashForge binaries.
//!
//! Console output plus an optional daily rolling NDJSON file.

pub mod logger;

pub use logger::{LogGuard, init_logger};
