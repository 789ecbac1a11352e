//! Configuration for the Windows trace reconstructor.
//!
//! This crate provides:
//! - The typed [`TraceConfig`] with built-in defaults for the monitor vocabulary
//! - Config resolution (CLI → env → XDG → defaults)
//! - Semantic validation

pub mod resolve;
pub mod trace;
pub mod validate;

pub use resolve::{load_config, resolve_config_path, ConfigSource, LoadedConfig};
pub use trace::TraceConfig;
pub use validate::{validate_config, ValidationError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
