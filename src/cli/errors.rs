//! CLI-specific error types
//!
//! All CLI errors are fatal: they are printed to stderr and the process
//! exits non-zero.

use std::fmt;
use std::io;

use crate::store::StoreError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Could not reach or query the database
    DatabaseError,
    /// I/O error (stdout, listener)
    IoError,
    /// Runtime or server startup failed
    BootFailed,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::DatabaseError => "LEKCE_CLI_DATABASE_ERROR",
            Self::IoError => "LEKCE_CLI_IO_ERROR",
            Self::BootFailed => "LEKCE_CLI_BOOT_FAILED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn database_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::DatabaseError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn boot_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::BootFailed, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        Self::database_error(e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code() {
        let err = CliError::boot_failed("bind failed");
        assert_eq!(err.to_string(), "LEKCE_CLI_BOOT_FAILED: bind failed");
        assert_eq!(err.message(), "bind failed");
    }

    #[test]
    fn test_store_error_maps_to_database_code() {
        let err = CliError::from(StoreError::constraint("fk"));
        assert_eq!(err.code(), &CliErrorCode::DatabaseError);
    }
}
