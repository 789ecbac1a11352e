//! Configuration validation errors and semantic validation.

use thiserror::Error;

use crate::trace::TraceConfig;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
        }
    }
}

/// Validate a trace configuration semantically.
pub fn validate_config(config: &TraceConfig) -> ValidationResult<()> {
    if config.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: config.schema_version.clone(),
        });
    }

    if let Some(executable) = &config.executable {
        if executable.trim().is_empty() {
            return Err(invalid("executable", "must not be empty"));
        }
        // Matched against the monitor's Process Name column, which never
        // carries a directory.
        if executable.contains(['\\', '/']) {
            return Err(invalid(
                "executable",
                format!("must be a base name, got {:?}", executable),
            ));
        }
    }

    if config.write_flags.is_empty() {
        return Err(invalid("write_flags", "at least one write flag is required"));
    }

    check_names("ignored_operations", &config.ignored_operations)?;
    check_names("write_flags", &config.write_flags)?;
    check_names("known_access_flags", &config.known_access_flags)?;

    Ok(())
}

fn check_names(field: &str, names: &[String]) -> ValidationResult<()> {
    if let Some(idx) = names.iter().position(|n| n.trim().is_empty()) {
        return Err(invalid(field, format!("entry {} is blank", idx)));
    }
    Ok(())
}

fn invalid(field: &str, message: impl Into<String>) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        message: message.into(),
    }
}
