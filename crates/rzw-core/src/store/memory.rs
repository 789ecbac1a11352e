//! In-memory trace store.

use std::collections::HashMap;

use rzw_common::{
    Error, FileAccess, NewProcess, ProcessEntry, ProcessKey, Result, RunId, TraceEvent,
};

use super::TraceStore;

/// Holds a single run as flat tables plus the ordered event sequence.
#[derive(Debug, Default)]
pub struct MemoryStore {
    run: Option<RunId>,
    processes: Vec<ProcessEntry>,
    index: HashMap<ProcessKey, usize>,
    accesses: Vec<FileAccess>,
    events: Vec<TraceEvent>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run_id(&self) -> Option<&RunId> {
        self.run.as_ref()
    }

    /// Processes in creation order; the root is first.
    pub fn processes(&self) -> &[ProcessEntry] {
        &self.processes
    }

    pub fn file_accesses(&self) -> &[FileAccess] {
        &self.accesses
    }

    /// All events in emission order.
    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<TraceEvent> {
        self.events
    }

    pub fn process(&self, key: ProcessKey) -> Option<&ProcessEntry> {
        self.index.get(&key).map(|&idx| &self.processes[idx])
    }

    /// Walk parent links from `key` up to the root, inclusive.
    pub fn ancestry(&self, key: ProcessKey) -> Vec<&ProcessEntry> {
        let mut chain = Vec::new();
        let mut next = self.process(key);
        while let Some(entry) = next {
            chain.push(entry);
            next = entry.parent.and_then(|parent| self.process(parent));
        }
        chain
    }

    /// Direct children of a process, in creation order.
    pub fn children(&self, key: ProcessKey) -> impl Iterator<Item = &ProcessEntry> {
        self.processes
            .iter()
            .filter(move |entry| entry.parent == Some(key))
    }

    fn check_run(&self, run: &RunId) -> Result<()> {
        match &self.run {
            Some(current) if current == run => Ok(()),
            Some(current) => Err(Error::Store(format!(
                "run {} does not belong to this store (holds {})",
                run, current
            ))),
            None => Err(Error::Store("no run has been created".to_string())),
        }
    }
}

impl TraceStore for MemoryStore {
    fn create_run(&mut self) -> Result<RunId> {
        if let Some(run) = &self.run {
            return Err(Error::Store(format!("store already holds run {}", run)));
        }
        let run = RunId::new();
        self.run = Some(run.clone());
        Ok(run)
    }

    fn add_process(&mut self, run: &RunId, process: &NewProcess) -> Result<ProcessKey> {
        self.check_run(run)?;
        match process.parent {
            None if !self.processes.is_empty() => {
                return Err(Error::Store("trace already has a root process".to_string()));
            }
            Some(parent) if !self.index.contains_key(&parent) => {
                return Err(Error::Store(format!("unknown parent process {}", parent)));
            }
            _ => {}
        }

        let key = ProcessKey(self.processes.len() as u64 + 1);
        let entry = ProcessEntry::from_new(key, process);
        self.events.push(TraceEvent::from(&entry));
        self.index.insert(key, self.processes.len());
        self.processes.push(entry);
        Ok(key)
    }

    fn add_file_access(&mut self, run: &RunId, access: &FileAccess) -> Result<()> {
        self.check_run(run)?;
        if !self.index.contains_key(&access.process) {
            return Err(Error::Store(format!(
                "file access by unknown process {}",
                access.process
            )));
        }
        self.events.push(TraceEvent::from(access));
        self.accesses.push(access.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use rzw_common::FileMode;

    fn ts(sec: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 17)
            .unwrap()
            .and_hms_opt(12, 0, sec)
            .unwrap()
    }

    fn new_process(parent: Option<ProcessKey>, pid: u32) -> NewProcess {
        NewProcess {
            parent,
            pid,
            command: parent.map(|_| format!("proc{pid}.exe")),
            timestamp: ts(pid % 60),
        }
    }

    #[test]
    fn test_keys_are_sequential() {
        let mut store = MemoryStore::new();
        let run = store.create_run().unwrap();
        let root = store.add_process(&run, &new_process(None, 100)).unwrap();
        let child = store.add_process(&run, &new_process(Some(root), 200)).unwrap();
        assert_eq!(root, ProcessKey(1));
        assert_eq!(child, ProcessKey(2));
        assert!(store.process(root).unwrap().is_root());
    }

    #[test]
    fn test_single_root() {
        let mut store = MemoryStore::new();
        let run = store.create_run().unwrap();
        store.add_process(&run, &new_process(None, 100)).unwrap();
        assert!(store.add_process(&run, &new_process(None, 101)).is_err());
    }

    #[test]
    fn test_parent_must_exist() {
        let mut store = MemoryStore::new();
        let run = store.create_run().unwrap();
        store.add_process(&run, &new_process(None, 100)).unwrap();
        let err = store
            .add_process(&run, &new_process(Some(ProcessKey(42)), 200))
            .unwrap_err();
        assert!(err.to_string().contains("unknown parent"));
    }

    #[test]
    fn test_foreign_run_rejected() {
        let mut store = MemoryStore::new();
        store.create_run().unwrap();
        let other = RunId::new();
        assert!(store.add_process(&other, &new_process(None, 1)).is_err());
        assert!(store.create_run().is_err());
    }

    #[test]
    fn test_access_requires_known_process() {
        let mut store = MemoryStore::new();
        let run = store.create_run().unwrap();
        let access = FileAccess {
            process: ProcessKey(1),
            pid: 100,
            path: r"C:\a".to_string(),
            mode: FileMode::Read,
            timestamp: ts(1),
            is_directory: false,
        };
        assert!(store.add_file_access(&run, &access).is_err());
        store.add_process(&run, &new_process(None, 100)).unwrap();
        store.add_file_access(&run, &access).unwrap();
        assert_eq!(store.events().len(), 2);
        assert_eq!(store.file_accesses().len(), 1);
    }

    #[test]
    fn test_ancestry_and_children() {
        let mut store = MemoryStore::new();
        let run = store.create_run().unwrap();
        let root = store.add_process(&run, &new_process(None, 100)).unwrap();
        let a = store.add_process(&run, &new_process(Some(root), 200)).unwrap();
        let b = store.add_process(&run, &new_process(Some(a), 300)).unwrap();
        store.add_process(&run, &new_process(Some(root), 400)).unwrap();

        let chain: Vec<u32> = store.ancestry(b).iter().map(|p| p.pid).collect();
        assert_eq!(chain, vec![300, 200, 100]);

        let kids: Vec<u32> = store.children(root).map(|p| p.pid).collect();
        assert_eq!(kids, vec![200, 400]);
    }
}
