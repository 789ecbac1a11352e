//! Engine configuration.
//!
//! Every field has a built-in default, so an empty JSON object (or no file at
//! all) yields a working configuration.

use serde::{Deserialize, Serialize};

use crate::validate::ValidationError;

/// Operations that never produce a trace event: lifecycle events, operations
/// on handles that are already open, and a few unclassifiable diagnostics.
pub const DEFAULT_IGNORED_OPERATIONS: &[&str] = &[
    // Non-file events
    "Process Start",
    "Thread Create",
    "Process Exit",
    "Thread Exit",
    // Already-open files
    "CloseFile",
    "RegCloseKey",
    "ReadFile",
    "WriteFile",
    "RegQueryValue",
    "CreateFileMapping",
    "QueryDirectory",
    "IRP_MJ_CLOSE",
    "QueryNameInformationFile",
    "QueryBasicInformationFile",
    "QueryStandardInformationFile",
    "QueryInformationVolume",
    "QueryAllInformationFile",
    "QueryEAFile",
    // Already-open registry keys
    "RegSetInfoKey",
    "RegEnumKey",
    "RegQueryKey",
    "RegEnumValue",
    // Unclassified
    "Process Profiling",
    "QueryOpen",
    "FASTIO_RELEASE_FOR_SECTION_SYNCHRONIZATION",
];

/// Access flags that make an open a write.
pub const DEFAULT_WRITE_FLAGS: &[&str] = &["Generic Write"];

/// Access flags the resolver knows about; anything else is tallied.
pub const DEFAULT_KNOWN_ACCESS_FLAGS: &[&str] = &[
    "Execute/Traverse",
    "Generic Read",
    "Read Attributes",
    "Read Data/List Directory",
    "Synchronize",
    "Generic Write",
];

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn default_schema_version() -> String {
    crate::CONFIG_SCHEMA_VERSION.to_string()
}

fn default_ignored_operations() -> Vec<String> {
    to_strings(DEFAULT_IGNORED_OPERATIONS)
}

fn default_write_flags() -> Vec<String> {
    to_strings(DEFAULT_WRITE_FLAGS)
}

fn default_known_access_flags() -> Vec<String> {
    to_strings(DEFAULT_KNOWN_ACCESS_FLAGS)
}

fn default_true() -> bool {
    true
}

/// Trace reconstruction settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceConfig {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Base name of the monitored executable (e.g. `python.exe`).
    ///
    /// Its `Process Start` event becomes the root of the trace.
    #[serde(default)]
    pub executable: Option<String>,

    #[serde(default = "default_ignored_operations")]
    pub ignored_operations: Vec<String>,

    #[serde(default = "default_write_flags")]
    pub write_flags: Vec<String>,

    #[serde(default = "default_known_access_flags")]
    pub known_access_flags: Vec<String>,

    /// Check each accessed path against the live filesystem.
    #[serde(default = "default_true")]
    pub probe_directories: bool,
}

impl Default for TraceConfig {
    fn default() -> Self {
        TraceConfig {
            schema_version: default_schema_version(),
            executable: None,
            ignored_operations: default_ignored_operations(),
            write_flags: default_write_flags(),
            known_access_flags: default_known_access_flags(),
            probe_directories: true,
        }
    }
}

impl TraceConfig {
    /// Load a configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ValidationError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::from_json(&content)
    }

    /// Parse a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        serde_json::from_str(json)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e)))
    }

    /// Set the monitored executable base name.
    pub fn with_executable(mut self, executable: impl Into<String>) -> Self {
        self.executable = Some(executable.into());
        self
    }

    /// Enable or disable filesystem directory probing.
    pub fn with_probe_directories(mut self, enabled: bool) -> Self {
        self.probe_directories = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_uses_defaults() {
        let config = TraceConfig::from_json("{}").unwrap();
        assert_eq!(config, TraceConfig::default());
        assert!(config.probe_directories);
        assert_eq!(config.write_flags, vec!["Generic Write".to_string()]);
    }

    #[test]
    fn test_partial_override() {
        let config = TraceConfig::from_json(
            r#"{"executable": "python.exe", "write_flags": ["Generic Write", "Generic All"]}"#,
        )
        .unwrap();
        assert_eq!(config.executable.as_deref(), Some("python.exe"));
        assert_eq!(config.write_flags.len(), 2);
        assert_eq!(config.ignored_operations.len(), DEFAULT_IGNORED_OPERATIONS.len());
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let err = TraceConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ValidationError::ParseError(_)));
    }

    #[test]
    fn test_registry_open_is_not_ignored_by_default() {
        assert!(!DEFAULT_IGNORED_OPERATIONS.contains(&"RegOpenKey"));
        assert!(DEFAULT_IGNORED_OPERATIONS.contains(&"RegQueryValue"));
    }

    #[test]
    fn test_builders() {
        let config = TraceConfig::default()
            .with_executable("app.exe")
            .with_probe_directories(false);
        assert_eq!(config.executable.as_deref(), Some("app.exe"));
        assert!(!config.probe_directories);
    }
}
