//! Row-to-struct mapping by mutator name.
//!
//! A [`SqlMapping`] type publishes a table of [`Mutator`]s, one per field,
//! named the way [`mutator_name`] names result columns (`setRegDate` for
//! `reg_date`). [`ShapeMapper`] resolves the columns of a result set against
//! that table once, then builds one `Default` instance per row and feeds each
//! bound column through its mutator. Columns without a mutator are skipped.

use crate::{
    errors::row::{MappingError, RowMapperError},
    internal_sqlite::row::Row,
    traits::{row_mapper::RowMapper, value::Value},
    utility::utils::mutator_name,
};

pub type Apply<T> = fn(&mut T, Value) -> Result<(), MappingError>;

/// A named single-argument assignment into `T`.
pub struct Mutator<T> {
    name: &'static str,
    apply: Apply<T>,
}

impl<T> Clone for Mutator<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Mutator<T> {}

impl<T> std::fmt::Debug for Mutator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mutator").field("name", &self.name).finish()
    }
}

impl<T> Mutator<T> {
    pub const fn new(name: &'static str, apply: Apply<T>) -> Self {
        Mutator { name, apply }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn apply(&self, target: &mut T, value: Value) -> Result<(), MappingError> {
        (self.apply)(target, value)
    }
}

/// A record type rows can be mapped into.
///
/// Usually derived with `#[derive(Default, SqlMapping)]`.
pub trait SqlMapping: Default {
    fn mutators() -> Vec<Mutator<Self>>;
}

/// [`RowMapper`] building a `T` per row through its mutator table.
pub struct ShapeMapper<T: SqlMapping> {
    columns: Vec<String>,
    mutators: Vec<Mutator<T>>,
    // column index -> mutator index
    bindings: Vec<Option<usize>>,
}

impl<T: SqlMapping> ShapeMapper<T> {
    pub fn new(columns: Vec<String>) -> Self {
        let mutators = T::mutators();

        let bindings = columns
            .iter()
            .map(|column| {
                let name = mutator_name(column);
                let found = mutators.iter().position(|m| m.name == name);
                if found.is_none() {
                    tracing::trace!(column = %column, mutator = %name, "no mutator for column, skipping");
                }
                found
            })
            .collect();

        ShapeMapper {
            columns,
            mutators,
            bindings,
        }
    }

    /// `(column, mutator)` pairs in column order, `None` for skipped columns.
    pub fn bindings(&self) -> impl Iterator<Item = (&str, Option<&'static str>)> + '_ {
        self.columns
            .iter()
            .zip(&self.bindings)
            .map(|(column, binding)| (column.as_str(), binding.map(|i| self.mutators[i].name)))
    }
}

impl<T: SqlMapping> RowMapper for ShapeMapper<T> {
    type Output = T;

    fn map_row(&self, row: &Row<'_>) -> Result<T, RowMapperError> {
        let mut instance = T::default();

        for (index, binding) in self.bindings.iter().enumerate() {
            let Some(mutator) = binding.map(|i| &self.mutators[i]) else {
                continue;
            };

            mutator
                .apply(&mut instance, row.value(index)?)
                .map_err(|source| RowMapperError::Mapping {
                    column: self.columns[index].clone(),
                    mutator: mutator.name,
                    source,
                })?;
        }

        Ok(instance)
    }
}

/// Reads the first column of a row, `NULL` when the statement has none.
pub struct FirstColumn;

impl RowMapper for FirstColumn {
    type Output = Value;

    fn map_row(&self, row: &Row<'_>) -> Result<Value, RowMapperError> {
        if row.column_count() == 0 {
            return Ok(Value::Null);
        }
        row.value(0)
    }
}
