//! CLI module for hyperlekce
//!
//! Provides command-line interface for:
//! - serve: Start the HTTP server (PostgreSQL or in-memory store)
//! - dump: One-shot print of the lesson tree

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, DatabaseArgs, HttpArgs};
pub use commands::{dump, dump_store, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_json, write_json_to};
