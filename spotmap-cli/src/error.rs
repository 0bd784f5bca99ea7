//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;
use spotmap::repository::RepositoryError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Failed to create the repository
    RepositoryCreation(RepositoryError),
    /// A repository request failed
    Request(RepositoryError),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::Request(RepositoryError::Http(_)) => {
                eprintln!();
                eprintln!("Common issues:");
                eprintln!("  1. The API endpoint is unreachable or down");
                eprintln!("  2. --api-url points at the wrong host");
                eprintln!("  3. The request timed out (10s limit)");
            }
            CliError::Request(RepositoryError::NotFound(_)) => {
                eprintln!();
                eprintln!("Use 'spotmap search' to list available spot ids.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::RepositoryCreation(e) => {
                write!(f, "Failed to create repository: {}", e)
            }
            CliError::Request(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::RepositoryCreation(e) | CliError::Request(e) => Some(e),
            CliError::LoggingInit(_) => None,
        }
    }
}

impl From<RepositoryError> for CliError {
    fn from(e: RepositoryError) -> Self {
        Self::Request(e)
    }
}
