//! Trace reconstruction core.
//!
//! Turns a Process Monitor CSV export into the process tree and file
//! accesses of one monitored program:
//! - Time-of-day decoding and detail-string parsing
//! - Operation classification and access-mode resolution
//! - Process scope tracking from the root program down
//! - Emission into a [`store::TraceStore`]
//!
//! The binary entry point is in `main.rs`.

pub mod access;
pub mod classify;
pub mod details;
pub mod diagnostics;
pub mod exit_codes;
pub mod fsprobe;
pub mod logging;
pub mod reader;
pub mod record;
pub mod scope;
pub mod store;
pub mod time;

pub use diagnostics::Diagnostics;
pub use reader::{read_trace_events, TraceReader, TraceSummary};
pub use store::{JsonlStore, MemoryStore, TraceStore};
