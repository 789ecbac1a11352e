//! Output formats for the reconstructed trace.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Supported output formats for the reconstructed trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One JSON document holding the summary and every trace event
    #[default]
    Json,

    /// One JSON object per accepted record, streamed as the log is read
    Jsonl,

    /// Counts and diagnostics only
    Summary,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Jsonl => write!(f, "jsonl"),
            OutputFormat::Summary => write!(f, "summary"),
        }
    }
}
