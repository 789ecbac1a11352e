//! Fuzz target for whole-log reconstruction.
//!
//! Arbitrary bytes are fed as a CSV export; the reader must return either a
//! trace or an error, never panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use rzw_config::TraceConfig;
use rzw_core::{MemoryStore, TraceReader};

fuzz_target!(|data: &[u8]| {
    let config = TraceConfig::default()
        .with_executable("python.exe")
        .with_probe_directories(false);
    let reference = chrono::NaiveDate::from_ymd_opt(2026, 1, 1)
        .and_then(|d| d.and_hms_opt(12, 0, 0));
    let Some(reference) = reference else { return };
    if let Ok(reader) = TraceReader::new(MemoryStore::new(), &config) {
        let mut reader = reader.with_time_reference(reference);
        let _ = reader.read(data, "fuzz.csv");
    }
});
