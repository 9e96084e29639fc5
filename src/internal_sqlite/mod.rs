pub mod connection;
pub mod row;
pub mod statement;
