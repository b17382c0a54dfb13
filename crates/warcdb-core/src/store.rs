//! The `RecordStore` trait and the insert policy passed through it.
//!
//! The trait is implemented by storage backends (e.g. `warcdb-store-sqlite`).
//! [`crate::WarcDb`] depends on this abstraction, not on any concrete
//! backend.

use crate::{conversion::ColumnType, route::ForeignKey, row::Row};

/// What to do when a row's primary key already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OnConflict {
  /// Keep the existing row; the insert is a silent no-op.
  #[default]
  Ignore,
}

/// Everything a backend needs to place one row.
#[derive(Debug, Clone, Copy)]
pub struct InsertSpec<'a> {
  pub primary_key:  &'a str,
  /// Logical references; backends must accept rows whose referenced record
  /// has not been stored (yet).
  pub foreign_keys: &'a [ForeignKey],
  /// Create missing columns instead of failing.
  pub alter:        bool,
  pub on_conflict:  OnConflict,
  /// Type hints for known columns; everything else is text.
  pub column_types: &'a [(&'a str, ColumnType)],
}

/// Outcome of a single insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
  Inserted,
  /// A row with the same primary key already existed.
  Ignored,
}

/// Abstraction over the relational store records are written to.
///
/// There is a single writer per store; implementations need not be `Sync`.
pub trait RecordStore {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Insert `row` into `table`, creating or widening the table as `spec`
  /// allows. The row is written atomically or not at all.
  fn insert(
    &self,
    table: &str,
    row: &Row,
    spec: &InsertSpec<'_>,
  ) -> Result<InsertOutcome, Self::Error>;
}
