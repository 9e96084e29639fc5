use crate::{errors::Error, traits::to_sql::ToSql};

/// The six statement shapes the executor knows how to run.
///
/// Arguments bind to `?` placeholders in order, starting at index 1.
pub trait Executor<T> {
    /// Runs SQL without parameters and ignores any rows it produces (DDL, scripts).
    fn execute(&self, sql: &str) -> Result<(), Error>;

    /// Returns the generated rowid, or `None` when the statement inserted nothing.
    fn insert(&self, sql: &str, args: &[&dyn ToSql]) -> Result<Option<i64>, Error>;

    /// Maps the first row only.
    fn select_one(&self, sql: &str, args: &[&dyn ToSql]) -> Result<Option<T>, Error>;

    /// Maps every row in result order. No match gives an empty vec.
    fn select_list(&self, sql: &str, args: &[&dyn ToSql]) -> Result<Vec<T>, Error>;

    /// Returns the number of affected rows.
    fn update_or_delete(&self, sql: &str, args: &[&dyn ToSql]) -> Result<usize, Error>;

    /// First column of the first row, `0` for no rows or NULL.
    fn select_count(&self, sql: &str, args: &[&dyn ToSql]) -> Result<i64, Error>;
}
