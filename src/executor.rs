use std::marker::PhantomData;

use crate::{
    config::ConnectionConfig,
    errors::{Error, row::RowMapperError},
    internal_sqlite::connection::Connection,
    mapping::{FirstColumn, ShapeMapper, SqlMapping},
    traits::{executor::Executor, from_sql::FromSql, to_sql::ToSql, value::Value},
};

/// Runs statements against the configured database and maps rows into `T`.
///
/// Holds configuration only. Every call opens its own connection and closes
/// it before returning, so the executor can be shared between threads.
pub struct SqlExecutor<T> {
    config: ConnectionConfig,
    _shape: PhantomData<fn() -> T>,
}

impl<T> std::fmt::Debug for SqlExecutor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlExecutor")
            .field("config", &self.config)
            .finish()
    }
}

impl<T> Clone for SqlExecutor<T> {
    fn clone(&self) -> Self {
        SqlExecutor {
            config: self.config.clone(),
            _shape: PhantomData,
        }
    }
}

impl<T: SqlMapping> SqlExecutor<T> {
    pub fn new(
        driver: &str,
        url: &str,
        principal: &str,
        credential: &str,
    ) -> Result<Self, Error> {
        Self::from_config(ConnectionConfig::new(driver, url, principal, credential))
    }

    pub fn from_config(config: ConnectionConfig) -> Result<Self, Error> {
        config
            .validate()
            .inspect_err(|err| tracing::error!(%err, "driver registration failed"))?;

        if config.is_memory() {
            tracing::warn!(
                url = %config.url,
                "in-memory database: every operation opens a new empty database"
            );
        }

        Ok(SqlExecutor {
            config,
            _shape: PhantomData,
        })
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    fn connect(&self) -> Result<Connection, Error> {
        let conn = Connection::open(self.config.database_path())?;
        conn.busy_timeout(self.config.busy_timeout_ms)?;
        Ok(conn)
    }

    fn insert_inner(&self, sql: &str, args: &[&dyn ToSql]) -> Result<Option<i64>, Error> {
        let conn = self.connect()?;
        let stmt = conn.prepare(sql)?;
        stmt.bind_all(args)?;
        stmt.step()?;

        // a fresh connection reports rowid 0 until a rowid insert happens, so
        // WITHOUT ROWID tables and non-insert statements land here too
        let rowid = conn.last_insert_rowid();
        if conn.changes() == 0 || rowid == 0 {
            return Ok(None);
        }
        Ok(Some(rowid))
    }

    fn select_one_inner(&self, sql: &str, args: &[&dyn ToSql]) -> Result<Option<T>, Error> {
        let conn = self.connect()?;
        let stmt = conn.prepare(sql)?;
        stmt.bind_all(args)?;

        let mapper = ShapeMapper::<T>::new(stmt.column_names());
        let instance = stmt.query(mapper).first()?;
        Ok(instance)
    }

    fn select_list_inner(&self, sql: &str, args: &[&dyn ToSql]) -> Result<Vec<T>, Error> {
        let conn = self.connect()?;
        let stmt = conn.prepare(sql)?;
        stmt.bind_all(args)?;

        let mapper = ShapeMapper::<T>::new(stmt.column_names());
        let instances = stmt.query(mapper).all()?;
        Ok(instances)
    }

    fn update_or_delete_inner(&self, sql: &str, args: &[&dyn ToSql]) -> Result<usize, Error> {
        let conn = self.connect()?;
        let stmt = conn.prepare(sql)?;
        stmt.bind_all(args)?;
        stmt.step()?;

        Ok(conn.changes())
    }

    fn select_count_inner(&self, sql: &str, args: &[&dyn ToSql]) -> Result<i64, Error> {
        let conn = self.connect()?;
        let stmt = conn.prepare(sql)?;
        stmt.bind_all(args)?;

        let count = match stmt.query(FirstColumn).first()? {
            None | Some(Value::Null) => 0,
            // SUM/AVG over REAL columns; truncated toward zero
            Some(Value::Real(real)) => real as i64,
            Some(value) => i64::from_value(value).map_err(|source| {
                RowMapperError::Mapping {
                    column: stmt.column_names().into_iter().next().unwrap_or_default(),
                    mutator: "count",
                    source,
                }
            })?,
        };
        Ok(count)
    }
}

impl<T: SqlMapping> Executor<T> for SqlExecutor<T> {
    fn execute(&self, sql: &str) -> Result<(), Error> {
        self.connect()
            .and_then(|conn| Ok(conn.exec(sql)?))
            .inspect_err(|err| tracing::error!(%err, sql, "execute failed"))
    }

    fn insert(&self, sql: &str, args: &[&dyn ToSql]) -> Result<Option<i64>, Error> {
        self.insert_inner(sql, args)
            .inspect_err(|err| tracing::error!(%err, sql, "insert failed"))
    }

    fn select_one(&self, sql: &str, args: &[&dyn ToSql]) -> Result<Option<T>, Error> {
        self.select_one_inner(sql, args)
            .inspect_err(|err| tracing::error!(%err, sql, "select_one failed"))
    }

    fn select_list(&self, sql: &str, args: &[&dyn ToSql]) -> Result<Vec<T>, Error> {
        self.select_list_inner(sql, args)
            .inspect_err(|err| tracing::error!(%err, sql, "select_list failed"))
    }

    fn update_or_delete(&self, sql: &str, args: &[&dyn ToSql]) -> Result<usize, Error> {
        self.update_or_delete_inner(sql, args)
            .inspect_err(|err| tracing::error!(%err, sql, "update_or_delete failed"))
    }

    fn select_count(&self, sql: &str, args: &[&dyn ToSql]) -> Result<i64, Error> {
        self.select_count_inner(sql, args)
            .inspect_err(|err| tracing::error!(%err, sql, "select_count failed"))
    }
}
