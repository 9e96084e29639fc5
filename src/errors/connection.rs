use std::ffi::c_int;

#[derive(thiserror::Error, Debug)]
pub enum SqliteOpenErrors {
    /// This error occurs when SQLite is unable to allocate memory to hold
    /// the database connection object.
    #[error("SQLite is unable to allocate memory to hold the database connection object")]
    ConnectionAllocationFailed,

    #[error("{filename} contains a null byte")]
    EmbeddedNullInFileName { filename: String },

    // in case of any other errors
    #[error("SQLite error {code}: {error_msg}")]
    SqliteFailure { code: c_int, error_msg: String },
}

#[derive(thiserror::Error, Debug)]
pub enum SqlitePrepareErrors {
    #[error("SQL statement contains a null byte")]
    EmbeddedNullInSql,

    /// The input was empty, whitespace or only a comment.
    #[error("SQL text does not contain a statement")]
    EmptyStatement,

    #[error("SQLite error {code}: {error_msg}")]
    SqliteFailure { code: c_int, error_msg: String },
}
