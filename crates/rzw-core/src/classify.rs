//! Maps raw monitor operations to semantic trace events.
//!
//! | operation | condition | result |
//! |---|---|---|
//! | ignored set | | `Ignore` |
//! | `Load Image` | `SUCCESS` | `FileRead` |
//! | `CreateFile` | `SUCCESS` | `FileAccess`, mode from `Desired Access` |
//! | `CreateFile` | otherwise | `Ignore` |
//! | `RegOpenKey` | | `Ignore` (registry access is not modeled) |
//! | `Process Create` | `PID: <n>, Command line: ...` | `ProcessCreate` |
//! | `Process Create` | otherwise | `UnrecognizedDetail` |
//! | anything else | | `Unknown` |

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use rzw_common::FileMode;
use rzw_config::TraceConfig;

use crate::access::{AccessModeResolver, DESIRED_ACCESS};
use crate::details::parse_details;
use crate::diagnostics::Diagnostics;
use crate::record::RawRecord;

/// Operation and result names with fixed meaning.
pub mod operations {
    pub const PROCESS_START: &str = "Process Start";
    pub const PROCESS_CREATE: &str = "Process Create";
    pub const LOAD_IMAGE: &str = "Load Image";
    pub const CREATE_FILE: &str = "CreateFile";
    pub const REG_OPEN_KEY: &str = "RegOpenKey";

    pub const SUCCESS: &str = "SUCCESS";
}

static PROCESS_CREATE_DETAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^PID: ([0-9]+), Command line: (.*)$").unwrap());

/// Outcome of classifying one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Ignore,
    /// A successful image load.
    FileRead { path: String },
    /// A successful file create/open.
    FileAccess { path: String, mode: FileMode },
    ProcessCreate { pid: u32, command: String },
    /// A process-create record whose detail text has an unexpected shape.
    UnrecognizedDetail { detail: String },
    Unknown { operation: String },
}

/// Parse the detail text of a `Process Create` record.
///
/// Returns the child pid and its full command line.
pub fn parse_process_create(detail: &str) -> Option<(u32, String)> {
    let caps = PROCESS_CREATE_DETAIL.captures(detail)?;
    let pid = caps[1].parse().ok()?;
    Some((pid, caps[2].to_string()))
}

#[derive(Debug, Clone)]
pub struct OperationClassifier {
    ignored: HashSet<String>,
    access: AccessModeResolver,
}

impl OperationClassifier {
    pub fn new<I>(ignored: I, access: AccessModeResolver) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        OperationClassifier {
            ignored: ignored.into_iter().map(Into::into).collect(),
            access,
        }
    }

    pub fn from_config(config: &TraceConfig) -> Self {
        Self::new(
            config.ignored_operations.iter().cloned(),
            AccessModeResolver::from_config(config),
        )
    }

    /// Classify a record, tallying unknown operations, unknown access flags
    /// and unrecognized process-create details.
    pub fn classify(&self, record: &RawRecord, diagnostics: &mut Diagnostics) -> Classification {
        use operations::*;

        let operation = record.operation.as_str();
        if self.ignored.contains(operation) {
            return Classification::Ignore;
        }

        let succeeded = record.result == SUCCESS;
        match operation {
            LOAD_IMAGE if succeeded => Classification::FileRead {
                path: record.path.clone(),
            },
            CREATE_FILE if succeeded => {
                let details = parse_details(&record.detail);
                let mode = self
                    .access
                    .resolve(details.values(DESIRED_ACCESS), diagnostics);
                Classification::FileAccess {
                    path: record.path.clone(),
                    mode,
                }
            }
            LOAD_IMAGE | CREATE_FILE => Classification::Ignore,
            REG_OPEN_KEY => Classification::Ignore,
            PROCESS_CREATE => match parse_process_create(&record.detail) {
                Some((pid, command)) => Classification::ProcessCreate { pid, command },
                None => {
                    diagnostics.record_unrecognized_detail();
                    Classification::UnrecognizedDetail {
                        detail: record.detail.clone(),
                    }
                }
            },
            _ => {
                diagnostics.record_unknown_operation(operation);
                Classification::Unknown {
                    operation: operation.to_string(),
                }
            }
        }
    }
}

impl Default for OperationClassifier {
    fn default() -> Self {
        Self::from_config(&TraceConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(operation: &str, path: &str, result: &str, detail: &str) -> RawRecord {
        RawRecord {
            time_of_day: "1:00:00.0 PM".to_string(),
            process_name: "python.exe".to_string(),
            pid: "100".to_string(),
            operation: operation.to_string(),
            path: path.to_string(),
            result: result.to_string(),
            detail: detail.to_string(),
        }
    }

    fn classify(rec: &RawRecord) -> (Classification, Diagnostics) {
        let mut diag = Diagnostics::default();
        let c = OperationClassifier::default().classify(rec, &mut diag);
        (c, diag)
    }

    #[test]
    fn test_ignored_operations() {
        for op in ["Process Start", "Thread Create", "ReadFile", "RegQueryValue", "QueryOpen"] {
            let (c, diag) = classify(&record(op, r"C:\x", "SUCCESS", ""));
            assert_eq!(c, Classification::Ignore, "{op}");
            assert!(diag.is_clean());
        }
    }

    #[test]
    fn test_load_image() {
        let (c, _) = classify(&record("Load Image", r"C:\Windows\System32\ntdll.dll", "SUCCESS", ""));
        assert_eq!(
            c,
            Classification::FileRead {
                path: r"C:\Windows\System32\ntdll.dll".to_string()
            }
        );

        let (c, _) = classify(&record("Load Image", r"C:\missing.dll", "NAME NOT FOUND", ""));
        assert_eq!(c, Classification::Ignore);
    }

    #[test]
    fn test_create_file_modes() {
        let (c, _) = classify(&record(
            "CreateFile",
            r"C:\data.txt",
            "SUCCESS",
            "Desired Access: Generic Read, Synchronize: Disposition: Open",
        ));
        assert_eq!(
            c,
            Classification::FileAccess {
                path: r"C:\data.txt".to_string(),
                mode: FileMode::Read
            }
        );

        let (c, _) = classify(&record(
            "CreateFile",
            r"C:\out.bin",
            "SUCCESS",
            "Desired Access: Generic Write, Read Attributes: Disposition: OverwriteIf",
        ));
        assert_eq!(
            c,
            Classification::FileAccess {
                path: r"C:\out.bin".to_string(),
                mode: FileMode::Write
            }
        );
    }

    #[test]
    fn test_failed_create_file_ignored() {
        let (c, diag) = classify(&record(
            "CreateFile",
            r"C:\nope.txt",
            "NAME NOT FOUND",
            "Desired Access: Bogus Flag",
        ));
        assert_eq!(c, Classification::Ignore);
        // The detail is never parsed, so nothing is tallied.
        assert!(diag.is_clean());
    }

    #[test]
    fn test_create_file_without_desired_access_is_read() {
        let (c, _) = classify(&record("CreateFile", r"C:\a", "SUCCESS", "Disposition: Open"));
        assert!(matches!(c, Classification::FileAccess { mode: FileMode::Read, .. }));
    }

    #[test]
    fn test_registry_open_deferred() {
        let (c, diag) = classify(&record("RegOpenKey", r"HKLM\Software", "SUCCESS", ""));
        assert_eq!(c, Classification::Ignore);
        assert!(diag.is_clean());
    }

    #[test]
    fn test_process_create() {
        let (c, _) = classify(&record(
            "Process Create",
            r"C:\child.exe",
            "SUCCESS",
            r#"PID: 200, Command line: "C:\child.exe" --flag, value"#,
        ));
        assert_eq!(
            c,
            Classification::ProcessCreate {
                pid: 200,
                command: r#""C:\child.exe" --flag, value"#.to_string()
            }
        );
    }

    #[test]
    fn test_process_create_unrecognized() {
        let (c, diag) = classify(&record("Process Create", "", "SUCCESS", "Parent PID: 4"));
        assert!(matches!(c, Classification::UnrecognizedDetail { .. }));
        assert_eq!(diag.unrecognized_details, 1);

        // A pid that does not fit in 32 bits is malformed too.
        let (c, _) = classify(&record(
            "Process Create",
            "",
            "SUCCESS",
            "PID: 99999999999, Command line: x",
        ));
        assert!(matches!(c, Classification::UnrecognizedDetail { .. }));
    }

    #[test]
    fn test_unknown_operation_tallied() {
        let (c, diag) = classify(&record("SetRenameInformationFile", r"C:\a", "SUCCESS", ""));
        assert_eq!(
            c,
            Classification::Unknown {
                operation: "SetRenameInformationFile".to_string()
            }
        );
        assert_eq!(
            diag.unknown_operations.get("SetRenameInformationFile"),
            Some(&1)
        );
    }

    #[test]
    fn test_parse_process_create_multiline_command() {
        let (pid, command) = parse_process_create("PID: 7, Command line: a\nb").unwrap();
        assert_eq!(pid, 7);
        assert_eq!(command, "a\nb");
    }
}
