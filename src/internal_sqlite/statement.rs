use libsqlite3_sys::{
    SQLITE_BUSY, SQLITE_CONSTRAINT_CHECK, SQLITE_CONSTRAINT_FOREIGNKEY, SQLITE_CONSTRAINT_NOTNULL,
    SQLITE_CONSTRAINT_PRIMARYKEY, SQLITE_CONSTRAINT_UNIQUE, SQLITE_DONE, SQLITE_OK, SQLITE_ROW,
    sqlite3_bind_parameter_count, sqlite3_column_count, sqlite3_column_name, sqlite3_finalize,
    sqlite3_step, sqlite3_stmt,
};
use std::ffi::{CStr, c_int};

use crate::{
    errors::statement::{BindErrors, StatementStepErrors},
    internal_sqlite::{connection::Connection, row::Rows},
    traits::{row_mapper::RowMapper, to_sql::ToSql},
    utility::utils::get_sqlite_failiure,
};

/// A prepared statement borrowed from its connection. Finalized on drop,
/// which always happens before the connection itself closes.
pub struct Statement<'conn> {
    pub(crate) conn: &'conn Connection,
    pub(crate) stmt: *mut sqlite3_stmt,
}

impl Drop for Statement<'_> {
    fn drop(&mut self) {
        unsafe {
            sqlite3_finalize(self.stmt);
        }
    }
}

impl Statement<'_> {
    /// Number of `?` placeholders in the statement.
    pub fn parameter_count(&self) -> usize {
        let count = unsafe { sqlite3_bind_parameter_count(self.stmt) };
        usize::try_from(count).unwrap_or(0)
    }

    ///note index start from 1 and not 0
    pub fn bind_parameter(&self, index: usize, value: &dyn ToSql) -> Result<(), BindErrors> {
        let position = c_int::try_from(index).map_err(|_| BindErrors::InvalidParameterCount {
            expected: self.parameter_count(),
            actual: index,
        })?;
        let code = unsafe { value.bind_to(self.stmt, position) };

        if code != SQLITE_OK {
            let (code, error_msg) = unsafe { get_sqlite_failiure(self.conn.db) };
            Err(BindErrors::SqliteFailure {
                index,
                code,
                error_msg,
            })
        } else {
            Ok(())
        }
    }

    /// Binds `args` positionally. The count has to match the placeholders exactly.
    pub fn bind_all(&self, args: &[&dyn ToSql]) -> Result<(), BindErrors> {
        let expected = self.parameter_count();
        if expected != args.len() {
            return Err(BindErrors::InvalidParameterCount {
                expected,
                actual: args.len(),
            });
        }

        for (i, value) in args.iter().enumerate() {
            self.bind_parameter(i + 1, *value)?;
        }
        Ok(())
    }

    pub fn column_count(&self) -> usize {
        let count = unsafe { sqlite3_column_count(self.stmt) };
        usize::try_from(count).unwrap_or(0)
    }

    /// Name of result column `index` (the `AS` alias when there is one).
    pub fn column_name(&self, index: usize) -> String {
        let ptr = unsafe { sqlite3_column_name(self.stmt, index as c_int) };
        if ptr.is_null() {
            String::new()
        } else {
            unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
        }
    }

    /// Result column names, in order.
    pub fn column_names(&self) -> Vec<String> {
        (0..self.column_count()).map(|i| self.column_name(i)).collect()
    }

    /// Runs the statement to completion, discarding any rows it yields.
    /// Used for write operations (INSERT, UPDATE, DELETE).
    pub fn step(&self) -> Result<(), StatementStepErrors> {
        loop {
            let code = unsafe { sqlite3_step(self.stmt) };

            if code == SQLITE_DONE {
                return Ok(());
            } else if code != SQLITE_ROW {
                return Err(self.step_error(code));
            }
        }
    }

    pub(crate) fn step_error(&self, code: c_int) -> StatementStepErrors {
        if code & 0xff == SQLITE_BUSY {
            return StatementStepErrors::SqliteBusy;
        }

        let (code, error_msg) = unsafe { get_sqlite_failiure(self.conn.db) };

        if code == SQLITE_CONSTRAINT_FOREIGNKEY {
            StatementStepErrors::ForeignKeyConstraint { code, error_msg }
        } else if code == SQLITE_CONSTRAINT_UNIQUE || code == SQLITE_CONSTRAINT_PRIMARYKEY {
            StatementStepErrors::UniqueConstraint { code, error_msg }
        } else if code == SQLITE_CONSTRAINT_CHECK {
            StatementStepErrors::CheckConstraint { code, error_msg }
        } else if code == SQLITE_CONSTRAINT_NOTNULL {
            StatementStepErrors::NotNullConstraint { code, error_msg }
        } else {
            StatementStepErrors::SqliteFailure { code, error_msg }
        }
    }

    pub fn query<'a, M: RowMapper>(&'a self, mapper: M) -> Rows<'a, M> {
        Rows {
            stmt: self,
            mapper,
            done: false,
        }
    }
}
