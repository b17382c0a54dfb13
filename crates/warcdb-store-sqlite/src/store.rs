//! [`SqliteStore`]: the SQLite implementation of [`RecordStore`].

use std::path::Path;

use rusqlite::Connection;
use tracing::debug;
use warcdb_core::{
  route,
  row::Row,
  store::{InsertOutcome, InsertSpec, OnConflict, RecordStore},
};

use crate::{
  Error, Result,
  encode::{decl_type, encode_value, hint_for},
  schema::{self, PRAGMAS},
  table::TableHandle,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A warcdb store backed by a single SQLite file.
///
/// Owns one connection for its whole lifetime; there is a single writer.
pub struct SqliteStore {
  conn: Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path`.
  pub fn open(path: impl AsRef<Path>) -> Result<Self> {
    Self::init(Connection::open(path)?)
  }

  /// Open an in-memory store, mainly for tests.
  pub fn open_in_memory() -> Result<Self> {
    Self::init(Connection::open_in_memory()?)
  }

  fn init(conn: Connection) -> Result<Self> {
    conn.execute_batch(PRAGMAS)?;
    Ok(Self { conn })
  }

  /// Introspection handle for `name`.
  pub fn table(&self, name: &str) -> TableHandle<'_> {
    TableHandle::new(&self.conn, name)
  }

  /// Total rows across all record tables.
  pub fn record_count(&self) -> Result<u64> {
    route::tables().map(|t| self.table(t).count()).sum()
  }

  /// The underlying connection, for ad-hoc queries.
  pub fn connection(&self) -> &Connection { &self.conn }
}

/// Names of the existing columns of `table`; empty when it does not exist.
fn existing_columns(conn: &Connection, table: &str) -> Result<Vec<String>> {
  let sql = format!("PRAGMA table_info({})", schema::quote_ident(table)?);
  let mut stmt = conn.prepare(&sql)?;
  let names = stmt
    .query_map([], |row| row.get::<_, String>(1))?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(names)
}

fn has_column(columns: &[String], name: &str) -> bool {
  columns.iter().any(|c| c.eq_ignore_ascii_case(name))
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for SqliteStore {
  type Error = Error;

  fn insert(
    &self,
    table: &str,
    row: &Row,
    spec: &InsertSpec<'_>,
  ) -> Result<InsertOutcome> {
    if row.is_empty() {
      return Err(Error::EmptyRow(table.to_owned()));
    }

    let names: Vec<&str> = row.names().collect();
    let values: Vec<_> = row
      .iter()
      .map(|(name, value)| encode_value(value, hint_for(name, spec.column_types)))
      .collect();

    // Dropped without commit on any error below, rolling back schema changes.
    let tx = self.conn.unchecked_transaction()?;

    let existing = existing_columns(&tx, table)?;
    if existing.is_empty() {
      let mut columns: Vec<(&str, &str)> = names
        .iter()
        .map(|n| (*n, decl_type(hint_for(n, spec.column_types))))
        .collect();
      for fk in spec.foreign_keys {
        if !row.contains(fk.column) {
          columns.push((fk.column, decl_type(hint_for(fk.column, spec.column_types))));
        }
      }
      let ddl = schema::create_table(table, &columns, spec.primary_key, spec.foreign_keys)?;
      tx.execute_batch(&ddl)?;
      debug!(table, columns = columns.len(), "created table");
    } else {
      for name in names.iter().filter(|n| !has_column(&existing, n)) {
        if !spec.alter {
          return Err(Error::MissingColumn {
            table:  table.to_owned(),
            column: (*name).to_owned(),
          });
        }
        let decl = decl_type(hint_for(name, spec.column_types));
        tx.execute_batch(&schema::add_column(table, name, decl)?)?;
        debug!(table, column = *name, "added column");
      }
    }

    let sql = match spec.on_conflict {
      OnConflict::Ignore => schema::insert_or_ignore(table, &names)?,
    };
    let changed = tx.execute(&sql, rusqlite::params_from_iter(values.iter()))?;
    tx.commit()?;

    Ok(if changed == 0 {
      InsertOutcome::Ignored
    } else {
      InsertOutcome::Inserted
    })
  }
}
