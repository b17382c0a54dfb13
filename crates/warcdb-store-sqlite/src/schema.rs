//! SQL generation for the dynamically shaped record tables.
//!
//! Record tables have no fixed DDL: a table is created from the first row
//! routed to it and gains a column whenever a later row carries a field it
//! has not seen. Columns are never dropped.

use warcdb_core::route::ForeignKey;

use crate::{Error, Result};

/// Executed once per connection.
///
/// Foreign keys stay declared but unenforced so records may reference rows
/// that arrive later in the stream.
pub const PRAGMAS: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = OFF;
";

/// Quote `name` as an SQL identifier.
pub fn quote_ident(name: &str) -> Result<String> {
  if name.is_empty() || name.contains('\0') {
    return Err(Error::InvalidIdentifier(name.to_owned()));
  }
  Ok(format!("\"{}\"", name.replace('"', "\"\"")))
}

/// `CREATE TABLE` for a record table.
///
/// `columns` are `(name, declared type)` pairs and must already include
/// every foreign-key column.
pub fn create_table(
  table: &str,
  columns: &[(&str, &str)],
  primary_key: &str,
  foreign_keys: &[ForeignKey],
) -> Result<String> {
  let mut defs = Vec::with_capacity(columns.len() + foreign_keys.len());
  for (name, decl) in columns {
    let mut def = format!("{} {decl}", quote_ident(name)?);
    if name.eq_ignore_ascii_case(primary_key) {
      def.push_str(" PRIMARY KEY NOT NULL");
    }
    defs.push(def);
  }
  for fk in foreign_keys {
    defs.push(format!(
      "FOREIGN KEY ({}) REFERENCES {}({})",
      quote_ident(fk.column)?,
      quote_ident(fk.ref_table)?,
      quote_ident(fk.ref_column)?,
    ));
  }
  Ok(format!(
    "CREATE TABLE {} (\n    {}\n)",
    quote_ident(table)?,
    defs.join(",\n    ")
  ))
}

pub fn add_column(table: &str, column: &str, decl: &str) -> Result<String> {
  Ok(format!(
    "ALTER TABLE {} ADD COLUMN {} {decl}",
    quote_ident(table)?,
    quote_ident(column)?
  ))
}

pub fn insert_or_ignore(table: &str, columns: &[&str]) -> Result<String> {
  let names = columns
    .iter()
    .map(|c| quote_ident(c))
    .collect::<Result<Vec<_>>>()?;
  let placeholders = (1..=columns.len())
    .map(|i| format!("?{i}"))
    .collect::<Vec<_>>();
  Ok(format!(
    "INSERT OR IGNORE INTO {} ({}) VALUES ({})",
    quote_ident(table)?,
    names.join(", "),
    placeholders.join(", ")
  ))
}
