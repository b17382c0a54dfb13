//! Error type for `warcdb-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] rusqlite::Error),

  #[error("table {table} has no column {column} and schema alteration is disabled")]
  MissingColumn { table: String, column: String },

  #[error("invalid identifier: {0:?}")]
  InvalidIdentifier(String),

  #[error("refusing to insert an empty row into {0}")]
  EmptyRow(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
