//! Fuzz target for Detail column parsing.
//!
//! Tests that `parse_details` handles arbitrary input without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use rzw_core::details::parse_details;

fuzz_target!(|data: &str| {
    let map = parse_details(data);
    for (name, values) in map.iter() {
        assert!(!name.is_empty());
        assert!(values.iter().all(|v| !v.is_empty()));
    }
});
