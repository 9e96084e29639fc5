use libsqlite3_sys::{
    SQLITE_BLOB, SQLITE_DONE, SQLITE_FLOAT, SQLITE_INTEGER, SQLITE_ROW, SQLITE_TEXT,
    sqlite3_column_blob, sqlite3_column_bytes, sqlite3_column_double, sqlite3_column_int64,
    sqlite3_column_text, sqlite3_column_type, sqlite3_step,
};
use std::{ffi::c_int, slice};

use crate::{
    errors::{row::RowMapperError, statement::StatementStepErrors},
    internal_sqlite::statement::Statement,
    traits::{row_mapper::RowMapper, value::Value},
};

/// The row a statement is currently positioned on.
///
/// Only handed out by [`Rows`] right after `sqlite3_step` returned
/// `SQLITE_ROW`, and only for the duration of one `map_row` call.
pub struct Row<'a> {
    stmt: &'a Statement<'a>,
}

impl Row<'_> {
    pub fn column_count(&self) -> usize {
        self.stmt.column_count()
    }

    pub fn column_name(&self, index: usize) -> String {
        self.stmt.column_name(index)
    }

    /// Reads column `index` (0-based) as its SQLite storage class.
    ///
    /// TEXT that is not valid UTF-8 is an error rather than being replaced.
    pub fn value(&self, index: usize) -> Result<Value, RowMapperError> {
        let stmt = self.stmt.stmt;
        let i = index as c_int;

        let value = unsafe {
            match sqlite3_column_type(stmt, i) {
                SQLITE_INTEGER => Value::Integer(sqlite3_column_int64(stmt, i)),
                SQLITE_FLOAT => Value::Real(sqlite3_column_double(stmt, i)),
                SQLITE_TEXT => {
                    // text pointer first, then its length
                    let ptr = sqlite3_column_text(stmt, i);
                    let len = sqlite3_column_bytes(stmt, i);
                    if ptr.is_null() {
                        Value::Null
                    } else {
                        let bytes = slice::from_raw_parts(ptr, len as usize).to_vec();
                        let text = String::from_utf8(bytes).map_err(|err| {
                            RowMapperError::InvalidUtf8 {
                                column: self.column_name(index),
                                valid_up_to: err.utf8_error().valid_up_to(),
                            }
                        })?;
                        Value::Text(text)
                    }
                }
                SQLITE_BLOB => {
                    let ptr = sqlite3_column_blob(stmt, i);
                    let len = sqlite3_column_bytes(stmt, i);
                    if ptr.is_null() || len <= 0 {
                        Value::Blob(Vec::new())
                    } else {
                        Value::Blob(slice::from_raw_parts(ptr as *const u8, len as usize).to_vec())
                    }
                }
                _ => Value::Null,
            }
        };
        Ok(value)
    }
}

/// Steps a statement and feeds every row through a [`RowMapper`].
pub struct Rows<'a, M: RowMapper> {
    pub(crate) stmt: &'a Statement<'a>,
    pub(crate) mapper: M,
    pub(crate) done: bool,
}

impl<M: RowMapper> Iterator for Rows<'_, M> {
    type Item = Result<M::Output, RowMapperError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result_code = unsafe { sqlite3_step(self.stmt.stmt) };

        if result_code == SQLITE_ROW {
            let row = Row { stmt: self.stmt };
            let item = self.mapper.map_row(&row);
            if item.is_err() {
                self.done = true;
            }
            Some(item)
        } else if result_code == SQLITE_DONE {
            // stepping again after DONE would restart the statement
            self.done = true;
            None
        } else {
            self.done = true;
            let err = match self.stmt.step_error(result_code) {
                StatementStepErrors::SqliteBusy => RowMapperError::SqliteBusy,
                StatementStepErrors::ForeignKeyConstraint { code, error_msg }
                | StatementStepErrors::UniqueConstraint { code, error_msg }
                | StatementStepErrors::CheckConstraint { code, error_msg }
                | StatementStepErrors::NotNullConstraint { code, error_msg }
                | StatementStepErrors::SqliteFailure { code, error_msg } => {
                    RowMapperError::SqliteFailure { code, error_msg }
                }
            };
            Some(Err(err))
        }
    }
}

impl<M: RowMapper> Rows<'_, M> {
    /// Returns the first row if available, or `None` if the query returned no results.
    pub fn first(mut self) -> Result<Option<M::Output>, RowMapperError> {
        self.next().transpose()
    }

    /// Collects the iterator into a vector of rows.
    pub fn all(self) -> Result<Vec<M::Output>, RowMapperError> {
        self.collect()
    }
}
