//! Exit codes for the `rzw` CLI.
//!
//! Exit code ranges:
//! - 0: trace reconstructed
//! - 10-19: user/input errors (recoverable by user action)
//! - 20-29: internal and I/O errors

use rzw_common::{Error, ErrorCategory};

/// Exit codes for `rzw` operations.
///
/// These codes are a stable contract for automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Trace reconstructed (diagnostics may still have been reported)
    Clean = 0,

    /// Invalid arguments or configuration
    ArgsError = 10,

    /// Input is not a well-formed monitor CSV export
    FormatError = 12,

    /// Internal error (bug - please report)
    InternalError = 20,

    /// I/O error reading the trace or writing output
    IoError = 21,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Clean)
    }

    /// Stable symbolic name for machine consumers.
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK_CLEAN",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::FormatError => "ERR_FORMAT",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::IoError => "ERR_IO",
        }
    }

    /// Map an engine error onto its exit code.
    pub fn from_error(err: &Error) -> Self {
        match err.category() {
            ErrorCategory::Format => ExitCode::FormatError,
            ErrorCategory::Config => ExitCode::ArgsError,
            ErrorCategory::Io => ExitCode::IoError,
            ErrorCategory::Store => ExitCode::InternalError,
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}
