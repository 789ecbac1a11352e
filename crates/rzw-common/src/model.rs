//! Reconstructed trace data model.
//!
//! Both entity kinds are append-only: the engine creates each one exactly
//! once during its forward pass and never mutates it afterwards.
//! Parent links are [`ProcessKey`] lookups into a flat table, never
//! back-pointers.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::id::ProcessKey;

/// Timestamp layout used in serialized traces.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// How a file was accessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileMode {
    Read,
    Write,
}

impl std::fmt::Display for FileMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileMode::Read => write!(f, "read"),
            FileMode::Write => write!(f, "write"),
        }
    }
}

/// A process about to be registered with a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProcess {
    /// Creating process, `None` only for the root.
    pub parent: Option<ProcessKey>,
    /// OS pid at creation time.
    pub pid: u32,
    /// Command line; the monitor never reports one for the root.
    pub command: Option<String>,
    #[serde(with = "timestamp")]
    pub timestamp: NaiveDateTime,
}

/// One process observed in scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessEntry {
    pub key: ProcessKey,
    pub parent: Option<ProcessKey>,
    pub pid: u32,
    pub command: Option<String>,
    #[serde(with = "timestamp")]
    pub timestamp: NaiveDateTime,
    /// Reserved; the engine only emits processes.
    #[serde(default)]
    pub is_thread: bool,
}

impl ProcessEntry {
    /// Materialize a registered process under its assigned key.
    pub fn from_new(key: ProcessKey, process: &NewProcess) -> Self {
        ProcessEntry {
            key,
            parent: process.parent,
            pid: process.pid,
            command: process.command.clone(),
            timestamp: process.timestamp,
            is_thread: false,
        }
    }

    /// Whether this is the root of the trace.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// One classified file or image access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAccess {
    /// Owning process, resolved from `pid` against the scope at read time.
    pub process: ProcessKey,
    pub pid: u32,
    /// Path exactly as reported by the monitor.
    pub path: String,
    pub mode: FileMode,
    #[serde(with = "timestamp")]
    pub timestamp: NaiveDateTime,
    /// Best-effort check against the live filesystem at processing time.
    pub is_directory: bool,
}

/// Ordered, tagged output of the in-memory trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TraceEvent {
    Process {
        key: ProcessKey,
        parent: Option<ProcessKey>,
        pid: u32,
        command: Option<String>,
        #[serde(with = "timestamp")]
        time: NaiveDateTime,
    },
    Access {
        mode: FileMode,
        path: String,
        #[serde(with = "timestamp")]
        time: NaiveDateTime,
        pid: u32,
        process: ProcessKey,
        is_directory: bool,
    },
}

impl From<&ProcessEntry> for TraceEvent {
    fn from(entry: &ProcessEntry) -> Self {
        TraceEvent::Process {
            key: entry.key,
            parent: entry.parent,
            pid: entry.pid,
            command: entry.command.clone(),
            time: entry.timestamp,
        }
    }
}

impl From<&FileAccess> for TraceEvent {
    fn from(access: &FileAccess) -> Self {
        TraceEvent::Access {
            mode: access.mode,
            path: access.path.clone(),
            time: access.timestamp,
            pid: access.pid,
            process: access.process,
            is_directory: access.is_directory,
        }
    }
}

/// Serde adapter for [`TIMESTAMP_FORMAT`].
pub mod timestamp {
    use super::TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 17)
            .unwrap()
            .and_hms_micro_opt(14, 3, 9, 120_000)
            .unwrap()
    }

    #[test]
    fn test_file_mode_serialization() {
        assert_eq!(serde_json::to_string(&FileMode::Read).unwrap(), "\"read\"");
        assert_eq!(FileMode::Write.to_string(), "write");
    }

    #[test]
    fn test_trace_event_is_tagged() {
        let event = TraceEvent::Access {
            mode: FileMode::Write,
            path: r"C:\out.bin".to_string(),
            time: ts(),
            pid: 200,
            process: ProcessKey(2),
            is_directory: false,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "access");
        assert_eq!(json["mode"], "write");
        assert_eq!(json["time"], "2026-10-17 14:03:09.120000");

        let back: TraceEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_process_entry_from_new() {
        let new = NewProcess {
            parent: Some(ProcessKey(1)),
            pid: 200,
            command: Some("child.exe".to_string()),
            timestamp: ts(),
        };
        let entry = ProcessEntry::from_new(ProcessKey(2), &new);
        assert_eq!(entry.key, ProcessKey(2));
        assert!(!entry.is_root());
        assert!(!entry.is_thread);
        assert_eq!(entry.command.as_deref(), Some("child.exe"));
    }
}
