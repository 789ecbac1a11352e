//! Trace accumulator: one forward pass over a monitor CSV export.
//!
//! For each row: decode the time, apply the scope tracker, classify the
//! operation, and emit process and file-access records into a
//! [`TraceStore`]. Structural problems (header, field count, time, pid)
//! abort the pass; vocabulary gaps are tallied in [`Diagnostics`] and
//! reported once the pass completes.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::NaiveDateTime;
use serde::Serialize;

use rzw_common::{Error, FileAccess, FileMode, NewProcess, ProcessKey, Result, RunId, TraceEvent};
use rzw_config::TraceConfig;

use crate::classify::{Classification, OperationClassifier};
use crate::diagnostics::Diagnostics;
use crate::fsprobe;
use crate::logging::event_names;
use crate::record::{header_matches, RawRecord, RecordReader};
use crate::scope::{ScopeDecision, ScopeTracker};
use crate::store::{MemoryStore, TraceStore};
use crate::time::TimeDecoder;

/// Counts for a run, cumulative across every input read into it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TraceSummary {
    pub run_id: Option<RunId>,
    /// Data rows read, excluding headers.
    pub rows: u64,
    pub in_scope_rows: u64,
    pub processes: u64,
    pub file_accesses: u64,
    pub root_pid: Option<u32>,
    pub diagnostics: Diagnostics,
}

/// Reconstructs a trace into `S`.
///
/// Each reader owns its scope map, clock reference and diagnostic counters;
/// nothing is shared between readers.
pub struct TraceReader<S: TraceStore> {
    store: S,
    classifier: OperationClassifier,
    scope: ScopeTracker,
    clock: TimeDecoder,
    probe_directories: bool,
    run: Option<RunId>,
    summary: TraceSummary,
}

impl<S: TraceStore> TraceReader<S> {
    /// Build a reader; `config.executable` must name the monitored program.
    pub fn new(store: S, config: &TraceConfig) -> Result<Self> {
        let executable = config.executable.clone().ok_or_else(|| {
            Error::Config("the monitored executable name is not set".to_string())
        })?;
        Ok(TraceReader {
            store,
            classifier: OperationClassifier::from_config(config),
            scope: ScopeTracker::new(executable),
            clock: TimeDecoder::new(),
            probe_directories: config.probe_directories,
            run: None,
            summary: TraceSummary::default(),
        })
    }

    /// Pin the date reference instead of taking the local clock on first read.
    pub fn with_time_reference(mut self, reference: NaiveDateTime) -> Self {
        self.clock = TimeDecoder::anchored(reference);
        self
    }

    pub fn summary(&self) -> &TraceSummary {
        &self.summary
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.summary.diagnostics
    }

    pub fn scope(&self) -> &ScopeTracker {
        &self.scope
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Open and read a CSV export from disk.
    pub fn read_path(&mut self, path: impl AsRef<Path>) -> Result<TraceSummary> {
        let path = path.as_ref();
        let file = File::open(path)?;
        self.read(file, &path.display().to_string())
    }

    /// Read a CSV export from any stream; `source_name` labels errors and logs.
    pub fn read<R: Read>(&mut self, input: R, source_name: &str) -> Result<TraceSummary> {
        let reference = self.clock.ensure_anchored();
        tracing::info!(
            event = event_names::TRACE_STARTED,
            source = source_name,
            executable = self.scope.executable(),
            reference = %reference,
            "Reading trace"
        );

        let mut records = RecordReader::new(BufReader::new(input), source_name);
        let header = match records.next_record()? {
            None => return Err(Error::format(source_name, "empty trace file")),
            Some((_, header)) => header,
        };
        if !header_matches(&header) {
            return Err(Error::format_at(source_name, 1, "wrong column names"));
        }

        self.open_run()?;

        while let Some((row_number, row)) = records.next_record()? {
            let record = RawRecord::from_csv(&row).ok_or_else(|| {
                Error::format_at(
                    source_name,
                    row_number,
                    format!("expected 7 fields, found {}", row.len()),
                )
            })?;
            self.process_record(&record, source_name, row_number)?;
        }

        self.report(source_name);
        Ok(self.summary.clone())
    }

    /// Feed one record through scope tracking, classification and emission.
    ///
    /// `source_name` and `row` only label errors.
    pub fn process_record(
        &mut self,
        record: &RawRecord,
        source_name: &str,
        row: u64,
    ) -> Result<()> {
        let time = self
            .clock
            .decode(&record.time_of_day)
            .map_err(|e| Error::format_at(source_name, row, e.to_string()))?;
        let pid: u32 = record.pid.trim().parse().map_err(|_| {
            Error::format_at(source_name, row, format!("invalid PID {:?}", record.pid))
        })?;
        self.summary.rows += 1;

        self.open_run()?;
        let Some(run) = self.run.as_ref() else {
            return Err(Error::Store("no run is open".to_string()));
        };

        let key = match self
            .scope
            .evaluate(&record.operation, &record.process_name, pid)
        {
            ScopeDecision::Root => {
                tracing::info!(
                    event = event_names::ROOT_FOUND,
                    pid,
                    process_name = %record.process_name,
                    "Tracing {}: {}",
                    pid,
                    record.process_name
                );
                let key = self.store.add_process(
                    run,
                    &NewProcess {
                        parent: None,
                        pid,
                        command: None,
                        timestamp: time,
                    },
                )?;
                self.scope.register_root(pid, key);
                self.summary.root_pid = Some(pid);
                self.summary.processes += 1;
                key
            }
            ScopeDecision::InScope(key) => key,
            ScopeDecision::OutOfScope => {
                tracing::trace!(pid, operation = %record.operation, "out of scope");
                return Ok(());
            }
        };
        self.summary.in_scope_rows += 1;

        match self
            .classifier
            .classify(record, &mut self.summary.diagnostics)
        {
            Classification::Ignore | Classification::Unknown { .. } => {}
            Classification::FileRead { path } => {
                emit_access(
                    &mut self.store,
                    run,
                    self.probe_directories,
                    key,
                    pid,
                    path,
                    FileMode::Read,
                    time,
                )?;
                self.summary.file_accesses += 1;
            }
            Classification::FileAccess { path, mode } => {
                emit_access(
                    &mut self.store,
                    run,
                    self.probe_directories,
                    key,
                    pid,
                    path,
                    mode,
                    time,
                )?;
                self.summary.file_accesses += 1;
            }
            Classification::ProcessCreate {
                pid: child_pid,
                command,
            } => {
                tracing::debug!(
                    event = event_names::PROCESS_CREATED,
                    parent_pid = pid,
                    child_pid,
                    command = %command,
                    "process created"
                );
                let child = self.store.add_process(
                    run,
                    &NewProcess {
                        parent: Some(key),
                        pid: child_pid,
                        command: Some(command),
                        timestamp: time,
                    },
                )?;
                self.scope.register_child(child_pid, child);
                self.summary.processes += 1;
            }
            Classification::UnrecognizedDetail { detail } => {
                tracing::warn!(
                    event = event_names::UNRECOGNIZED_DETAIL,
                    source = source_name,
                    row,
                    "Invalid process creation details: {:?}",
                    detail
                );
            }
        }
        Ok(())
    }

    fn open_run(&mut self) -> Result<()> {
        if self.run.is_none() {
            let run = self.store.create_run()?;
            self.summary.run_id = Some(run.clone());
            self.run = Some(run);
        }
        Ok(())
    }

    fn report(&self, source_name: &str) {
        let summary = &self.summary;
        tracing::info!(
            event = event_names::TRACE_FINISHED,
            source = source_name,
            rows = summary.rows,
            in_scope_rows = summary.in_scope_rows,
            processes = summary.processes,
            file_accesses = summary.file_accesses,
            "Trace complete"
        );
        if self.scope.is_empty() {
            tracing::warn!(
                event = event_names::ROOT_MISSING,
                executable = self.scope.executable(),
                "No Process Start for {} was found; the trace is empty",
                self.scope.executable()
            );
        }
        if !summary.diagnostics.is_clean() {
            tracing::warn!(
                event = event_names::DIAGNOSTICS,
                "\n{}",
                summary.diagnostics.render()
            );
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn emit_access<S: TraceStore>(
    store: &mut S,
    run: &RunId,
    probe_directories: bool,
    process: ProcessKey,
    pid: u32,
    path: String,
    mode: FileMode,
    timestamp: NaiveDateTime,
) -> Result<()> {
    let is_directory = probe_directories && fsprobe::is_directory(&path);
    store.add_file_access(
        run,
        &FileAccess {
            process,
            pid,
            path,
            mode,
            timestamp,
            is_directory,
        },
    )
}

/// Reconstruct a trace in memory and return its ordered events.
pub fn read_trace_events<R: Read>(
    input: R,
    source_name: &str,
    config: &TraceConfig,
) -> Result<(Vec<TraceEvent>, TraceSummary)> {
    let mut reader = TraceReader::new(MemoryStore::new(), config)?;
    let summary = reader.read(input, source_name)?;
    Ok((reader.into_store().into_events(), summary))
}
