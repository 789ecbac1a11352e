//! Fuzz target for time-of-day decoding.
//!
//! Anything that parses must render back to a string that parses to the
//! same time.

#![no_main]

use libfuzzer_sys::fuzz_target;
use rzw_core::time::{format_time_of_day, parse_time_of_day};

fuzz_target!(|data: &str| {
    if let Ok(time) = parse_time_of_day(data) {
        let rendered = format_time_of_day(time);
        assert_eq!(parse_time_of_day(&rendered).ok(), Some(time));
    }
});
