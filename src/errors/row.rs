use std::ffi::c_int;

#[derive(thiserror::Error, Debug)]
pub enum RowMapperError {
    #[error("SqliteBusy. Database stayed locked past the busy timeout")]
    SqliteBusy,

    #[error("failed to map column '{column}' through {mutator}: {source}")]
    Mapping {
        column: String,
        mutator: &'static str,
        source: MappingError,
    },

    #[error("column '{column}' holds TEXT that is not valid UTF-8 (valid up to byte {valid_up_to})")]
    InvalidUtf8 { column: String, valid_up_to: usize },

    // in case of any other errors
    #[error("SQLite error {code}: {error_msg}")]
    SqliteFailure { code: c_int, error_msg: String },
}

/// Raised when a single driver value cannot be assigned to a field.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum MappingError {
    #[error("cannot assign a {found} value to {target}")]
    TypeMismatch {
        found: &'static str,
        target: &'static str,
    },

    /// Numeric values go through a string round-trip; this is the parse failing.
    #[error("cannot coerce '{value}' into {target}")]
    Coercion { value: String, target: &'static str },

    #[error("NULL cannot be assigned to non-optional {target}")]
    UnexpectedNull { target: &'static str },
}
