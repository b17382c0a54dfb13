//! Encoding between [`warcdb_core::row::Value`]s and SQLite values.
//!
//! Type hints decide the declared column type and how a value is converted
//! on the way in. Conversion mirrors SQLite column affinity: text that reads
//! as an integer is stored as one in an `INTEGER` column, anything else is
//! kept as it came. No value is ever rejected. Timestamps are stored as the
//! header text, unchanged. Blobs are never rewritten.

use rusqlite::types::Value as SqlValue;
use warcdb_core::{conversion::ColumnType, row::Value};

// ─── Type hints ──────────────────────────────────────────────────────────────

pub fn hint_for(column: &str, hints: &[(&str, ColumnType)]) -> Option<ColumnType> {
  hints
    .iter()
    .find(|(name, _)| name.eq_ignore_ascii_case(column))
    .map(|(_, ty)| *ty)
}

/// Declared SQLite type for a column.
pub fn decl_type(hint: Option<ColumnType>) -> &'static str {
  match hint {
    Some(ColumnType::Integer) => "INTEGER",
    Some(ColumnType::Text | ColumnType::Timestamp) | None => "TEXT",
  }
}

// ─── Values ──────────────────────────────────────────────────────────────────

/// Convert `value` for storage under `hint`.
pub fn encode_value(value: &Value, hint: Option<ColumnType>) -> SqlValue {
  match (value, hint) {
    (Value::Null, _) => SqlValue::Null,

    (Value::Integer(n), Some(ColumnType::Text | ColumnType::Timestamp)) => {
      SqlValue::Text(n.to_string())
    }
    (Value::Integer(n), _) => SqlValue::Integer(*n),

    (Value::Text(s), Some(ColumnType::Integer)) => match s.trim().parse() {
      Ok(n) => SqlValue::Integer(n),
      Err(_) => SqlValue::Text(s.clone()),
    },
    (Value::Text(s), _) => SqlValue::Text(s.clone()),

    (Value::Blob(b), _) => SqlValue::Blob(b.clone()),
  }
}

pub fn decode_value(value: SqlValue) -> Value {
  match value {
    SqlValue::Null => Value::Null,
    SqlValue::Integer(n) => Value::Integer(n),
    SqlValue::Real(f) => Value::Text(f.to_string()),
    SqlValue::Text(s) => Value::Text(s),
    SqlValue::Blob(b) => Value::Blob(b),
  }
}
