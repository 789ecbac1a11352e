//! Fuzz target for config.json parsing.
//!
//! Tests that configuration parsing and validation handle arbitrary input
//! without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use rzw_config::{validate_config, TraceConfig};

fuzz_target!(|data: &[u8]| {
    if let Ok(config) = serde_json::from_slice::<TraceConfig>(data) {
        let _ = validate_config(&config);
    }
});
