use crate::{errors::row::RowMapperError, internal_sqlite::row::Row};

pub trait RowMapper {
    /// What one row turns into
    type Output;

    fn map_row(&self, row: &Row<'_>) -> Result<Self::Output, RowMapperError>;
}
