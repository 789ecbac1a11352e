//! Structured event names.
//!
//! Every `tracing` call that marks a stage of a trace pass carries one of
//! these as its `event` field so JSONL consumers can filter on it.

pub mod event_names {
    // Trace pass
    pub const TRACE_STARTED: &str = "trace.started";
    pub const ROOT_FOUND: &str = "trace.root_found";
    pub const PROCESS_CREATED: &str = "trace.process_created";
    pub const UNRECOGNIZED_DETAIL: &str = "trace.unrecognized_detail";
    pub const TRACE_FINISHED: &str = "trace.finished";
    pub const ROOT_MISSING: &str = "trace.root_missing";
    pub const DIAGNOSTICS: &str = "trace.diagnostics";

    // Config
    pub const CONFIG_LOADED: &str = "config.loaded";
    pub const CONFIG_DEFAULT_USED: &str = "config.default_used";

    // Output
    pub const OUTPUT_WRITTEN: &str = "output.written";
}

#[cfg(test)]
mod tests {
    use super::event_names;

    #[test]
    fn test_event_names_are_namespaced() {
        for name in [
            event_names::TRACE_STARTED,
            event_names::ROOT_FOUND,
            event_names::PROCESS_CREATED,
            event_names::UNRECOGNIZED_DETAIL,
            event_names::TRACE_FINISHED,
            event_names::ROOT_MISSING,
            event_names::DIAGNOSTICS,
            event_names::CONFIG_LOADED,
            event_names::CONFIG_DEFAULT_USED,
            event_names::OUTPUT_WRITTEN,
        ] {
            let (stage, what) = name.split_once('.').unwrap();
            assert!(!stage.is_empty() && !what.is_empty(), "{name}");
        }
    }
}
