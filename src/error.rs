//! Error types and handling infrastructure for logsieve.
//!
//! This module provides a centralized error handling system using `thiserror` for
//! custom error types. Every fallible operation in the crate returns [`Result`];
//! nothing in the filtering core panics on user input.
//!
//! ## Design Principles
//!
//! - **User-friendly messages**: errors are surfaced verbatim in the viewer's
//!   status channel, so each message must stand on its own
//! - **Bound-specific time errors**: a bad start time and a bad end time are
//!   distinct outcomes so the collaborator can highlight the offending field
//! - **Consistency**: standardized Result type across all modules

use std::path::PathBuf;
use thiserror::Error;

/// Which time-range bound a format error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeBound {
    Start,
    End,
}

impl std::fmt::Display for TimeBound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeBound::Start => write!(f, "start"),
            TimeBound::End => write!(f, "end"),
        }
    }
}

/// The main error type for logsieve operations.
///
/// Covers file access, time-window parsing, pattern compilation, tail
/// watching, and configuration persistence.
#[derive(Error, Debug)]
pub enum LogsieveError {
    /// File system related errors (read failure, permission denied, etc.)
    #[error("File operation failed: {message}")]
    FileError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// File not found specifically (common case for user feedback)
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Path exists but is not a regular file
    #[error("Path is not a regular file: {path}")]
    NotAFile { path: PathBuf },

    /// A time-range bound does not match the `HH:MM:SS.mmm` format.
    ///
    /// Aborts the whole filter invocation; no partial results are produced.
    #[error("Invalid {bound} time {input:?}: expected HH:MM:SS.mmm")]
    TimeFormat { bound: TimeBound, input: String },

    /// Keyword pattern compilation errors
    #[error("Pattern compilation failed: {message}")]
    PatternError { message: String },

    /// File-change watcher errors (tail mode)
    #[error("File watch failed: {message}")]
    WatchError { message: String },

    /// Configuration persistence errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Generic error for cases not covered by specific variants
    #[error("Operation failed: {message}")]
    Other { message: String },
}

/// Standard Result type for logsieve operations.
pub type Result<T> = std::result::Result<T, LogsieveError>;

impl LogsieveError {
    /// Create a FileError from an io::Error with additional context
    pub fn file_error(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::FileError {
            message: message.into(),
            source,
        }
    }

    /// Create a TimeFormat error for the given bound
    pub fn time_format(bound: TimeBound, input: impl Into<String>) -> Self {
        Self::TimeFormat {
            bound,
            input: input.into(),
        }
    }

    /// Create a PatternError with a descriptive message
    pub fn pattern(message: impl Into<String>) -> Self {
        Self::PatternError {
            message: message.into(),
        }
    }

    /// Create a WatchError with a descriptive message
    pub fn watch(message: impl Into<String>) -> Self {
        Self::WatchError {
            message: message.into(),
        }
    }

    /// Create a ConfigError with a descriptive message
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
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

// Automatic conversion from io::Error to LogsieveError
impl From<std::io::Error> for LogsieveError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::FileError {
                message: "File not found".to_string(),
                source: err,
            },
            std::io::ErrorKind::PermissionDenied => Self::FileError {
                message: "Permission denied".to_string(),
                source: err,
            },
            _ => Self::FileError {
                message: "IO operation failed".to_string(),
                source: err,
            },
        }
    }
}

impl From<notify::Error> for LogsieveError {
    fn from(err: notify::Error) -> Self {
        Self::WatchError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for LogsieveError {
    fn from(err: serde_json::Error) -> Self {
        Self::ConfigError {
            message: err.to_string(),
        }
    }
}
