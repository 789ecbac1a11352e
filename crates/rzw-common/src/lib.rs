//! Shared types for the Windows trace reconstructor.
//!
//! This crate provides the vocabulary used across the rzw crates:
//! - Run and process identifiers
//! - The reconstructed trace data model (processes, file accesses)
//! - Common error types with stable codes
//! - Output formats

pub mod error;
pub mod id;
pub mod model;
pub mod output;

pub use error::{Error, ErrorCategory, Result};
pub use id::{ProcessKey, RunId};
pub use model::{FileAccess, FileMode, NewProcess, ProcessEntry, TraceEvent, TIMESTAMP_FORMAT};
pub use output::OutputFormat;
