//! Column type hints applied by the store at insert time.

use crate::record::CONTENT_LENGTH;

/// Semantic type a store should give a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
  Integer,
  Text,
  Timestamp,
}

/// Fields with a known type. Anything not listed stays text.
pub const COLUMN_TYPES: &[(&str, ColumnType)] = &[
  (CONTENT_LENGTH, ColumnType::Integer),
  ("payload", ColumnType::Text),
  ("WARC-Date", ColumnType::Timestamp),
];

/// Look up the hint for `column` (ASCII case-insensitive).
pub fn column_type(column: &str) -> Option<ColumnType> {
  COLUMN_TYPES
    .iter()
    .find(|(name, _)| name.eq_ignore_ascii_case(column))
    .map(|(_, ty)| *ty)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn known_fields_have_hints() {
    assert_eq!(column_type("Content-Length"), Some(ColumnType::Integer));
    assert_eq!(column_type("content-length"), Some(ColumnType::Integer));
    assert_eq!(column_type("WARC-Date"), Some(ColumnType::Timestamp));
    assert_eq!(column_type("payload"), Some(ColumnType::Text));
  }

  #[test]
  fn unknown_fields_pass_through() {
    assert_eq!(column_type("WARC-Target-URI"), None);
    assert_eq!(column_type("http_headers"), None);
  }
}
