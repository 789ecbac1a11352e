//! Reduces `Desired Access` flags to a read/write classification.
//!
//! Coarse: any write-capable flag makes the access a write;
//! read, execute, attribute and synchronize flags all fold into read.

use std::collections::{BTreeSet, HashSet};

use rzw_common::FileMode;
use rzw_config::TraceConfig;

use crate::diagnostics::Diagnostics;

/// Field of the Detail column holding the requested access rights.
pub const DESIRED_ACCESS: &str = "Desired Access";

#[derive(Debug, Clone)]
pub struct AccessModeResolver {
    write_flags: HashSet<String>,
    known_flags: HashSet<String>,
}

impl AccessModeResolver {
    pub fn new<W, K>(write_flags: W, known_flags: K) -> Self
    where
        W: IntoIterator,
        W::Item: Into<String>,
        K: IntoIterator,
        K::Item: Into<String>,
    {
        let write_flags: HashSet<String> = write_flags.into_iter().map(Into::into).collect();
        let mut known_flags: HashSet<String> = known_flags.into_iter().map(Into::into).collect();
        // A write flag is by definition part of the vocabulary.
        known_flags.extend(write_flags.iter().cloned());
        AccessModeResolver {
            write_flags,
            known_flags,
        }
    }

    pub fn from_config(config: &TraceConfig) -> Self {
        Self::new(
            config.write_flags.iter().cloned(),
            config.known_access_flags.iter().cloned(),
        )
    }

    /// Classify a set of flags, tallying any outside the known vocabulary.
    ///
    /// Flags are treated as a set: a flag repeated within one record is
    /// tallied once.
    pub fn resolve(&self, flags: &[String], diagnostics: &mut Diagnostics) -> FileMode {
        let flags: BTreeSet<&str> = flags.iter().map(String::as_str).collect();

        for flag in flags.iter().filter(|f| !self.known_flags.contains(**f)) {
            diagnostics.record_unknown_access_flag(flag);
        }

        if flags.iter().any(|f| self.write_flags.contains(*f)) {
            FileMode::Write
        } else {
            FileMode::Read
        }
    }
}

impl Default for AccessModeResolver {
    fn default() -> Self {
        Self::from_config(&TraceConfig::default())
    }
}
