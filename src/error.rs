//! Error types and handling infrastructure for rcat.
//!
//! This module provides a centralized error handling system using `thiserror` for
//! custom error types and `anyhow` for application-level error handling with context.
//!
//! Pager cancellation is deliberately NOT represented here: quitting the pager is
//! ordinary control flow, modeled as [`crate::pager::PageFlow::Cancelled`], so it
//! never travels through an error path or produces an error message.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for rcat operations.
///
/// This enum covers the error conditions that can occur while opening and
/// reading sources, driving the terminal, and formatting output.
#[derive(Error, Debug)]
pub enum RcatError {
    /// A read failed mid-stream for reasons other than normal EOF. The path of
    /// the source is attached so multi-file runs can report which file broke.
    #[error("Read failed on {path}: {source}")]
    ReadFault {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File system related errors (permission denied, metadata failures, etc.)
    #[error("File operation failed: {message}")]
    FileError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Terminal related errors (raw mode, size query)
    #[error("Terminal operation failed: {message}")]
    TerminalError { message: String },

    /// Invalid command line arguments
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Generic error for cases not covered by specific variants
    #[error("Operation failed: {message}")]
    Other { message: String },
}

/// Standard Result type for rcat operations.
pub type Result<T> = std::result::Result<T, RcatError>;

impl RcatError {
    /// Create a ReadFault carrying the source path for diagnostics
    pub fn read_fault(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFault {
            path: path.into(),
            source,
        }
    }

    /// Create a FileError from an io::Error with additional context
    pub fn file_error(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::FileError {
            message: message.into(),
            source,
        }
    }

    /// Create a TerminalError with a descriptive message
    pub fn terminal(message: impl Into<String>) -> Self {
        Self::TerminalError {
            message: message.into(),
        }
    }

    /// Create a generic Other error with a descriptive message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}

// Automatic conversion from io::Error for paths where no source path is in scope
impl From<std::io::Error> for RcatError {
    fn from(err: std::io::Error) -> Self {
        Self::FileError {
            message: "IO operation failed".to_string(),
            source: err,
        }
    }
}
