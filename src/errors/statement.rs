use std::ffi::c_int;

#[derive(thiserror::Error, Debug)]
pub enum BindErrors {
    #[error("statement expects {expected} parameter(s) but {actual} were supplied")]
    InvalidParameterCount { expected: usize, actual: usize },

    #[error("failed to bind parameter {index}. SQLite error {code}: {error_msg}")]
    SqliteFailure {
        index: usize,
        code: c_int,
        error_msg: String,
    },
}

#[derive(thiserror::Error, Debug)]
pub enum StatementStepErrors {
    #[error("SqliteBusy. Database stayed locked past the busy timeout")]
    SqliteBusy,

    #[error("Foreign key constraint failed. Sqlite error {code} : {error_msg}")]
    ForeignKeyConstraint { code: c_int, error_msg: String },

    #[error("unique key or primary key constraint failed. Sqlite error {code} : {error_msg}")]
    UniqueConstraint { code: c_int, error_msg: String },

    #[error("Constraint check failed. Sqlite error {code} : {error_msg}")]
    CheckConstraint { code: c_int, error_msg: String },

    #[error("Not null constraint failed. Sqlite error {code} : {error_msg}")]
    NotNullConstraint { code: c_int, error_msg: String },

    // in case of any other errors
    #[error("SQLite error {code}: {error_msg}")]
    SqliteFailure { code: c_int, error_msg: String },
}
