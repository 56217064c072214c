//! # Observability
//!
//! Logging setup. Everything else in the crate logs through `tracing`
//! macros; this module installs the subscriber once at process start.

mod logger;

pub use logger::{init_logging, LogConfig, DEFAULT_LOG_FILTER};
