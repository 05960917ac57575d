//! Error types for the validation planner.

use thiserror::Error;

/// Process exit code for configuration errors.
pub const EXIT_CONFIG_ERROR: u8 = 1;
/// Process exit code for suffix-width validation failures.
pub const EXIT_VALIDATION_ERROR: u8 = 2;
/// Process exit code for key literals that do not match their declared type.
pub const EXIT_TYPE_MISMATCH: u8 = 3;
/// Process exit code for out-of-range partition fractions.
pub const EXIT_RANGE_ERROR: u8 = 4;
/// Process exit code for I/O failures (missing files, unreadable mirrors).
pub const EXIT_IO_ERROR: u8 = 7;

/// Main error type for planning operations.
///
/// Every variant is a deterministic configuration defect: retrying with the
/// same inputs always fails the same way.
#[derive(Error, Debug)]
pub enum ValidateError {
    /// Missing or malformed descriptor fields, bad catalog entries.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Suffix digit width cannot hold the configured numeric range.
    #[error("Validation failed for {field}: {message}")]
    Validation { field: String, message: String },

    /// Key literal does not parse under the declared key type.
    #[error("Type mismatch in table {table}: {field} = {value:?} is not a valid {expected}")]
    TypeMismatch {
        table: String,
        field: String,
        value: String,
        expected: String,
    },

    /// Partition fraction outside 1..=100.
    #[error("Range error in table {table}: partition fraction {value} must be between 1 and 100")]
    Range { table: String, value: i64 },

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ValidateError {
    /// Create a Validation error for a named field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidateError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a TypeMismatch error.
    pub fn type_mismatch(
        table: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        ValidateError::TypeMismatch {
            table: table.into(),
            field: field.into(),
            value: value.into(),
            expected: expected.into(),
        }
    }

    /// Create a Range error.
    pub fn range(table: impl Into<String>, value: i64) -> Self {
        ValidateError::Range {
            table: table.into(),
            value,
        }
    }

    /// Exit code the CLI should terminate with for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            ValidateError::Config(_) | ValidateError::Yaml(_) | ValidateError::Json(_) => {
                EXIT_CONFIG_ERROR
            }
            ValidateError::Validation { .. } => EXIT_VALIDATION_ERROR,
            ValidateError::TypeMismatch { .. } => EXIT_TYPE_MISMATCH,
            ValidateError::Range { .. } => EXIT_RANGE_ERROR,
            ValidateError::Io(_) => EXIT_IO_ERROR,
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for planning operations.
pub type Result<T> = std::result::Result<T, ValidateError>;
