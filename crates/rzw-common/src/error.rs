//! Error types for trace reconstruction.
//!
//! Only structural violations of the input contract are errors. Gaps in the
//! classification tables (new operation names, new access flags, process
//! creation details in an unexpected shape) are tallied as diagnostics by the
//! engine and never surface here.
//!
//! Errors carry:
//! - Stable error codes for machine parsing
//! - Category classification for grouping
//! - Remediation hints for humans
//!
//! ```text
//! ✗ Input format error
//!   Reason: temp.csv row 17: expected 7 fields, found 6
//!   Fix: Re-export the log as CSV with the default column set.
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for trace operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// The monitor log does not match the expected shape.
    Format,
    /// Configuration file errors.
    Config,
    /// The output store rejected a record.
    Store,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Format => write!(f, "format"),
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Store => write!(f, "store"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for trace reconstruction.
#[derive(Error, Debug)]
pub enum Error {
    // Format errors (10-19)
    #[error("{}: {reason}", location(source_name, *row))]
    Format {
        source_name: String,
        row: Option<u64>,
        reason: String,
    },

    // Configuration errors (20-29)
    #[error("configuration error: {0}")]
    Config(String),

    // Store errors (30-39)
    #[error("trace store error: {0}")]
    Store(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

fn location(source_name: &str, row: Option<u64>) -> String {
    match row {
        Some(row) => format!("{} row {}", source_name, row),
        None => source_name.to_string(),
    }
}

impl Error {
    /// Build a format error tied to a specific input row.
    pub fn format_at(source_name: impl Into<String>, row: u64, reason: impl Into<String>) -> Self {
        Error::Format {
            source_name: source_name.into(),
            row: Some(row),
            reason: reason.into(),
        }
    }

    /// Build a format error for the input as a whole.
    pub fn format(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Format {
            source_name: source_name.into(),
            row: None,
            reason: reason.into(),
        }
    }

    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Input format errors
    /// - 20-29: Configuration errors
    /// - 30-39: Store errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::Format { row: None, .. } => 10,
            Error::Format { row: Some(_), .. } => 11,
            Error::Config(_) => 20,
            Error::Store(_) => 30,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Format { .. } => ErrorCategory::Format,
            Error::Config(_) => ErrorCategory::Config,
            Error::Store(_) => ErrorCategory::Store,
            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Returns true for errors caused by the monitor log itself.
    pub fn is_format(&self) -> bool {
        matches!(self, Error::Format { .. })
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::Format { row: None, .. } => {
                "The log is empty or its header is wrong. Export it again with the columns: Time of Day, Process Name, PID, Operation, Path, Result, Detail."
            }
            Error::Format { row: Some(_), .. } => {
                "A row is structurally broken. Re-export the log as CSV with the default column set; partial traces are never produced."
            }
            Error::Config(_) => {
                "Run 'rzw config' to see the effective configuration and fix the reported field."
            }
            Error::Store(_) => "Check that the output destination is writable and retry.",
            Error::Io(_) => "Check that the input exists and the output location is writable.",
            Error::Json(_) => "Internal serialization failure. Report it with the input log.",
        }
    }
}
