//! Streaming JSONL trace store.
//!
//! Each accepted record becomes one line:
//!
//! ```text
//! {"type":"run","run_id":"run-3f2a9c0d41be"}
//! {"type":"process","run_id":"run-3f2a9c0d41be","key":1,"parent":null,"pid":100,...}
//! {"type":"access","run_id":"run-3f2a9c0d41be","process":1,"pid":100,"path":"C:\\data.txt",...}
//! ```

use std::collections::HashSet;
use std::io::{BufWriter, Write};

use serde::Serialize;

use rzw_common::{Error, FileAccess, NewProcess, ProcessEntry, ProcessKey, Result, RunId};

use super::TraceStore;

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Line<'a> {
    Run {
        run_id: &'a RunId,
    },
    Process {
        run_id: &'a RunId,
        #[serde(flatten)]
        entry: &'a ProcessEntry,
    },
    Access {
        run_id: &'a RunId,
        #[serde(flatten)]
        access: &'a FileAccess,
    },
}

/// Writes every insertion as a JSON line; keys are unique across runs.
pub struct JsonlStore<W: Write> {
    out: BufWriter<W>,
    runs: HashSet<RunId>,
    next_key: u64,
    lines: u64,
}

impl<W: Write> JsonlStore<W> {
    pub fn new(writer: W) -> Self {
        JsonlStore {
            out: BufWriter::new(writer),
            runs: HashSet::new(),
            next_key: 1,
            lines: 0,
        }
    }

    /// Number of lines written so far.
    pub fn lines_written(&self) -> u64 {
        self.lines
    }

    /// Flush buffered lines and hand back the writer.
    pub fn finish(self) -> Result<W> {
        self.out
            .into_inner()
            .map_err(|e| Error::Io(e.into_error()))
    }

    fn write_line(&mut self, line: &Line<'_>) -> Result<()> {
        serde_json::to_writer(&mut self.out, line)?;
        self.out.write_all(b"\n")?;
        self.lines += 1;
        Ok(())
    }

    fn check_run(&self, run: &RunId) -> Result<()> {
        if self.runs.contains(run) {
            Ok(())
        } else {
            Err(Error::Store(format!("run {} was not created by this store", run)))
        }
    }
}

impl<W: Write> TraceStore for JsonlStore<W> {
    fn create_run(&mut self) -> Result<RunId> {
        let run = RunId::new();
        self.write_line(&Line::Run { run_id: &run })?;
        self.runs.insert(run.clone());
        Ok(run)
    }

    fn add_process(&mut self, run: &RunId, process: &NewProcess) -> Result<ProcessKey> {
        self.check_run(run)?;
        let key = ProcessKey(self.next_key);
        let entry = ProcessEntry::from_new(key, process);
        self.write_line(&Line::Process { run_id: run, entry: &entry })?;
        self.next_key += 1;
        Ok(key)
    }

    fn add_file_access(&mut self, run: &RunId, access: &FileAccess) -> Result<()> {
        self.check_run(run)?;
        self.write_line(&Line::Access { run_id: run, access })
    }
}
