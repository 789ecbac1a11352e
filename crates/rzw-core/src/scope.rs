//! Decides, record by record, whether an event belongs to the monitored tree.
//!
//! The monitor captures all system activity. Scope starts empty; the first
//! `Process Start` of the monitored executable establishes the root, and
//! only in-scope processes that create children can grow it. Entries are
//! never removed: there is no process-exit handling, so a pid recycled by
//! the OS for an unrelated process stays in scope.

use std::collections::HashMap;

use rzw_common::ProcessKey;

use crate::classify::operations;

/// What to do with a record, evaluated before classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeDecision {
    /// This record starts the monitored executable; register it as the root.
    Root,
    /// The record's pid is tracked under this key.
    InScope(ProcessKey),
    /// Unrelated activity, or anything before the root appears.
    OutOfScope,
}

#[derive(Debug, Clone)]
pub struct ScopeTracker {
    executable: String,
    processes: HashMap<u32, ProcessKey>,
    root_pid: Option<u32>,
}

impl ScopeTracker {
    /// `executable` is the base name reported in the Process Name column.
    pub fn new(executable: impl Into<String>) -> Self {
        ScopeTracker {
            executable: executable.into(),
            processes: HashMap::new(),
            root_pid: None,
        }
    }

    pub fn executable(&self) -> &str {
        &self.executable
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    /// Number of pids currently in scope.
    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn root_pid(&self) -> Option<u32> {
        self.root_pid
    }

    pub fn key_of(&self, pid: u32) -> Option<ProcessKey> {
        self.processes.get(&pid).copied()
    }

    /// Decide scope for one record.
    pub fn evaluate(&self, operation: &str, process_name: &str, pid: u32) -> ScopeDecision {
        if self.processes.is_empty() {
            if operation == operations::PROCESS_START && process_name == self.executable {
                return ScopeDecision::Root;
            }
            return ScopeDecision::OutOfScope;
        }
        match self.key_of(pid) {
            Some(key) => ScopeDecision::InScope(key),
            None => ScopeDecision::OutOfScope,
        }
    }

    /// Register the root process. Only valid while scope is empty.
    pub fn register_root(&mut self, pid: u32, key: ProcessKey) -> bool {
        if !self.processes.is_empty() {
            return false;
        }
        self.root_pid = Some(pid);
        self.processes.insert(pid, key);
        true
    }

    /// Bring a child process into scope.
    ///
    /// A pid already in scope is re-pointed at the newer process.
    pub fn register_child(&mut self, pid: u32, key: ProcessKey) {
        self.processes.insert(pid, key);
    }
}
