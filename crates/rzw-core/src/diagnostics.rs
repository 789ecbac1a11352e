//! Diagnostic tallies for incomplete classification tables.
//!
//! The monitor's vocabulary is versioned outside our control. Operation names
//! and access flags we do not know are counted here and reported after the
//! pass, never raised as errors.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Counters accumulated over one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Operation name → occurrences, for operations with no classification.
    pub unknown_operations: BTreeMap<String, u64>,
    /// Access flag → occurrences, for flags outside the known vocabulary.
    pub unknown_access_flags: BTreeMap<String, u64>,
    /// Process-create records whose detail text did not match.
    pub unrecognized_details: u64,
}

impl Diagnostics {
    pub fn record_unknown_operation(&mut self, operation: &str) {
        *self
            .unknown_operations
            .entry(operation.to_string())
            .or_insert(0) += 1;
    }

    pub fn record_unknown_access_flag(&mut self, flag: &str) {
        *self
            .unknown_access_flags
            .entry(flag.to_string())
            .or_insert(0) += 1;
    }

    pub fn record_unrecognized_detail(&mut self) {
        self.unrecognized_details += 1;
    }

    /// True when nothing was tallied.
    pub fn is_clean(&self) -> bool {
        self.unknown_operations.is_empty()
            && self.unknown_access_flags.is_empty()
            && self.unrecognized_details == 0
    }

    /// Render the post-pass text summary.
    ///
    /// Sections with nothing to report are omitted; a clean pass renders as
    /// an empty string.
    pub fn render(&self) -> String {
        let mut out = String::new();
        render_section(&mut out, "Unknown operations", &self.unknown_operations);
        render_section(&mut out, "Unknown access modes", &self.unknown_access_flags);
        if self.unrecognized_details > 0 {
            let _ = writeln!(
                out,
                "Unrecognized process creation details: {}",
                self.unrecognized_details
            );
        }
        out
    }
}

fn render_section(out: &mut String, title: &str, counts: &BTreeMap<String, u64>) {
    if counts.is_empty() {
        return;
    }
    let _ = writeln!(out, "{}:", title);
    for (name, count) in counts {
        let _ = writeln!(out, "    {} ({})", name, count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_renders_empty() {
        let diag = Diagnostics::default();
        assert!(diag.is_clean());
        assert_eq!(diag.render(), "");
    }

    #[test]
    fn test_render_counts() {
        let mut diag = Diagnostics::default();
        diag.record_unknown_operation("SetDispositionInformationFile");
        diag.record_unknown_operation("SetDispositionInformationFile");
        diag.record_unknown_operation("FileSystemControl");
        diag.record_unknown_access_flag("Delete");

        assert!(!diag.is_clean());
        assert_eq!(
            diag.render(),
            "Unknown operations:\n    FileSystemControl (1)\n    SetDispositionInformationFile (2)\n\
             Unknown access modes:\n    Delete (1)\n"
        );
    }

    #[test]
    fn test_unrecognized_details_line() {
        let mut diag = Diagnostics::default();
        diag.record_unrecognized_detail();
        diag.record_unrecognized_detail();
        assert_eq!(diag.render(), "Unrecognized process creation details: 2\n");
    }
}
