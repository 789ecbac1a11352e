//! Destinations for the reconstructed trace.
//!
//! The engine inserts exactly one record per accepted event and never
//! batches, retries or rolls back; transaction boundaries belong to the
//! caller (e.g. flush once after the whole pass).

mod jsonl;
mod memory;

pub use jsonl::JsonlStore;
pub use memory::MemoryStore;

use rzw_common::{FileAccess, NewProcess, ProcessKey, Result, RunId};

/// A sink for one or more traced runs.
pub trait TraceStore {
    /// Open a new run; every later insertion is scoped to its id.
    fn create_run(&mut self) -> Result<RunId>;

    /// Register a process and return its store-assigned key.
    fn add_process(&mut self, run: &RunId, process: &NewProcess) -> Result<ProcessKey>;

    /// Record one file access by an already-registered process.
    fn add_file_access(&mut self, run: &RunId, access: &FileAccess) -> Result<()>;
}

impl<S: TraceStore + ?Sized> TraceStore for &mut S {
    fn create_run(&mut self) -> Result<RunId> {
        (**self).create_run()
    }

    fn add_process(&mut self, run: &RunId, process: &NewProcess) -> Result<ProcessKey> {
        (**self).add_process(run, process)
    }

    fn add_file_access(&mut self, run: &RunId, access: &FileAccess) -> Result<()> {
        (**self).add_file_access(run, access)
    }
}

impl<S: TraceStore + ?Sized> TraceStore for Box<S> {
    fn create_run(&mut self) -> Result<RunId> {
        (**self).create_run()
    }

    fn add_process(&mut self, run: &RunId, process: &NewProcess) -> Result<ProcessKey> {
        (**self).add_process(run, process)
    }

    fn add_file_access(&mut self, run: &RunId, access: &FileAccess) -> Result<()> {
        (**self).add_file_access(run, access)
    }
}
