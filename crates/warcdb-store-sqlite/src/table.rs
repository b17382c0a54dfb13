//! [`TableHandle`]: read-only introspection of one table.

use rusqlite::{Connection, OptionalExtension as _};
use warcdb_core::row::Row;

use crate::{Result, encode::decode_value, schema::quote_ident};

/// A column as reported by `PRAGMA table_info`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
  pub name:        String,
  pub decl_type:   String,
  pub primary_key: bool,
}

/// A declared foreign key as reported by `PRAGMA foreign_key_list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableForeignKey {
  pub column:     String,
  pub ref_table:  String,
  pub ref_column: String,
}

/// Borrowed view of a table; the table need not exist.
pub struct TableHandle<'a> {
  conn: &'a Connection,
  name: String,
}

impl<'a> TableHandle<'a> {
  pub(crate) fn new(conn: &'a Connection, name: &str) -> Self {
    Self { conn, name: name.to_owned() }
  }

  pub fn name(&self) -> &str { &self.name }

  pub fn exists(&self) -> Result<bool> {
    Ok(
      self
        .conn
        .query_row(
          "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
          rusqlite::params![self.name],
          |_| Ok(true),
        )
        .optional()?
        .unwrap_or(false),
    )
  }

  /// Row count; zero for a table that does not exist yet.
  pub fn count(&self) -> Result<u64> {
    if !self.exists()? {
      return Ok(0);
    }
    let sql = format!("SELECT count(*) FROM {}", quote_ident(&self.name)?);
    let n: i64 = self.conn.query_row(&sql, [], |r| r.get(0))?;
    Ok(n as u64)
  }

  pub fn columns(&self) -> Result<Vec<Column>> {
    let sql = format!("PRAGMA table_info({})", quote_ident(&self.name)?);
    let mut stmt = self.conn.prepare(&sql)?;
    let columns = stmt
      .query_map([], |row| {
        Ok(Column {
          name:        row.get(1)?,
          decl_type:   row.get(2)?,
          primary_key: row.get::<_, i64>(5)? > 0,
        })
      })?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(columns)
  }

  pub fn foreign_keys(&self) -> Result<Vec<TableForeignKey>> {
    let sql = format!("PRAGMA foreign_key_list({})", quote_ident(&self.name)?);
    let mut stmt = self.conn.prepare(&sql)?;
    let keys = stmt
      .query_map([], |row| {
        Ok(TableForeignKey {
          ref_table:  row.get(2)?,
          column:     row.get(3)?,
          ref_column: row.get(4)?,
        })
      })?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(keys)
  }

  /// Fetch the row whose primary key equals `key`.
  pub fn get(&self, key: &str) -> Result<Option<Row>> {
    let Some(pk) = self
      .columns()?
      .into_iter()
      .find(|c| c.primary_key)
    else {
      return Ok(None);
    };

    let sql = format!(
      "SELECT * FROM {} WHERE {} = ?1",
      quote_ident(&self.name)?,
      quote_ident(&pk.name)?
    );
    let mut stmt = self.conn.prepare(&sql)?;
    let names: Vec<String> = stmt.column_names().into_iter().map(str::to_owned).collect();

    let row = stmt
      .query_row(rusqlite::params![key], |r| {
        let mut row = Row::new();
        for (i, name) in names.iter().enumerate() {
          row.insert(name.as_str(), decode_value(r.get(i)?));
        }
        Ok(row)
      })
      .optional()?;
    Ok(row)
  }
}
