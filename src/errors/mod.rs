use std::ffi::c_int;

use crate::errors::{
    connection::{SqliteOpenErrors, SqlitePrepareErrors},
    row::RowMapperError,
    statement::{BindErrors, StatementStepErrors},
};

pub mod connection;
pub mod row;
pub mod statement;

/// recommended to **log** this error rather than directly handling it
#[derive(thiserror::Error, Debug)]
#[error("SQLite error {code}: {error_msg}")]
pub struct SqliteFailure {
    pub code: c_int,
    pub error_msg: String,
}

/// Unified error returned by every executor operation.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("unsupported driver '{driver}', expected sqlite")]
    UnsupportedDriver { driver: String },

    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Failed to open database: {0}")]
    Open(#[from] SqliteOpenErrors),

    #[error("Failed to prepare statement: {0}")]
    Prepare(#[from] SqlitePrepareErrors),

    #[error("Failed to Bind: {0}")]
    Bind(#[from] BindErrors),

    #[error("Failed to execute statement step: {0}")]
    Step(#[from] StatementStepErrors),

    #[error(transparent)]
    Row(#[from] RowMapperError),

    #[error(transparent)]
    Db(#[from] SqliteFailure),
}
