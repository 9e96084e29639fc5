pub mod executor;
pub mod from_sql;
pub mod row_mapper;
pub mod to_sql;
pub mod value;
