//! Structured fuzz target for per-record reconstruction.
//!
//! Feeds well-formed rows with arbitrary field contents straight into the
//! accumulator, starting from a valid root so scope tracking is exercised.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rzw_config::TraceConfig;
use rzw_core::record::RawRecord;
use rzw_core::{MemoryStore, TraceReader};

#[derive(Arbitrary, Debug)]
struct Row {
    time_of_day: String,
    process_name: String,
    pid: String,
    operation: String,
    path: String,
    result: String,
    detail: String,
}

impl From<Row> for RawRecord {
    fn from(row: Row) -> Self {
        RawRecord {
            time_of_day: row.time_of_day,
            process_name: row.process_name,
            pid: row.pid,
            operation: row.operation,
            path: row.path,
            result: row.result,
            detail: row.detail,
        }
    }
}

fuzz_target!(|rows: Vec<Row>| {
    let config = TraceConfig::default()
        .with_executable("python.exe")
        .with_probe_directories(false);
    let Ok(mut reader) = TraceReader::new(MemoryStore::new(), &config) else {
        return;
    };
    let root = RawRecord {
        time_of_day: "1:00:00.0 PM".to_string(),
        process_name: "python.exe".to_string(),
        pid: "100".to_string(),
        operation: "Process Start".to_string(),
        path: String::new(),
        result: "SUCCESS".to_string(),
        detail: String::new(),
    };
    if reader.process_record(&root, "fuzz", 1).is_err() {
        return;
    }
    for (idx, row) in rows.into_iter().enumerate() {
        let record = RawRecord::from(row);
        if reader.process_record(&record, "fuzz", idx as u64 + 2).is_err() {
            break;
        }
    }
    // Every emitted access belongs to a registered process.
    let store = reader.into_store();
    for access in store.file_accesses() {
        assert!(store.process(access.process).is_some());
    }
});
