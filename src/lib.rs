//! Run SQL against SQLite and map result rows onto plain structs.
//!
//! ```no_run
//! use sqlmapper::{Executor, SqlExecutor, SqlMapping};
//!
//! #[derive(Debug, Default, SqlMapping)]
//! struct Employee {
//!     seq: i64,
//!     name: String,
//!     age: i32,
//!     reg_date: Option<chrono::NaiveDateTime>,
//! }
//!
//! # fn main() -> Result<(), sqlmapper::Error> {
//! let employees = SqlExecutor::<Employee>::new("sqlite", "jdbc:sqlite:test.db", "sa", "")?;
//! let seq = employees.insert(
//!     "INSERT INTO employee (name, age, reg_date) VALUES (?, ?, CURRENT_TIMESTAMP)",
//!     &[&"sam", &31],
//! )?;
//! let sam = employees.select_one("SELECT * FROM employee WHERE seq = ?", &[&seq])?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod errors;
pub mod executor;
pub mod internal_sqlite;
pub mod mapping;
pub mod traits;
pub mod utility;

pub use config::ConnectionConfig;
pub use errors::{Error, row::MappingError, row::RowMapperError};
pub use executor::SqlExecutor;
pub use mapping::{Mutator, ShapeMapper, SqlMapping};
pub use sqlmapper_macros::SqlMapping;
pub use traits::{
    executor::Executor, from_sql::FromSql, row_mapper::RowMapper, to_sql::ToSql, value::Value,
};
pub use utility::utils::mutator_name;
