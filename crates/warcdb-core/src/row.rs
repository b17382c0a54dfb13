//! Flattening a [`WarcRecord`] into a storable [`Row`].
//!
//! [`RowAdapter`] owns a record together with the rows already derived from
//! it. The content stream can only be read once, so the drained payload and
//! every derived row live in the adapter for as long as the record does.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
  Result,
  record::{HttpHeaders, WarcRecord},
};

pub const HTTP_HEADERS_COLUMN: &str = "http_headers";
pub const PAYLOAD_COLUMN: &str = "payload";

// ─── Values ──────────────────────────────────────────────────────────────────

/// A single cell of a [`Row`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
  Null,
  Integer(i64),
  Text(String),
  Blob(Vec<u8>),
}

impl Value {
  pub fn as_text(&self) -> Option<&str> {
    match self {
      Self::Text(s) => Some(s),
      _ => None,
    }
  }

  pub fn as_integer(&self) -> Option<i64> {
    match self {
      Self::Integer(n) => Some(*n),
      _ => None,
    }
  }

  /// Raw bytes of a text or blob value.
  pub fn as_bytes(&self) -> Option<&[u8]> {
    match self {
      Self::Text(s) => Some(s.as_bytes()),
      Self::Blob(b) => Some(b),
      _ => None,
    }
  }

  pub fn is_null(&self) -> bool { matches!(self, Self::Null) }
}

impl From<&str> for Value {
  fn from(s: &str) -> Self { Self::Text(s.to_owned()) }
}

impl From<String> for Value {
  fn from(s: String) -> Self { Self::Text(s) }
}

impl From<i64> for Value {
  fn from(n: i64) -> Self { Self::Integer(n) }
}

impl From<Vec<u8>> for Value {
  fn from(b: Vec<u8>) -> Self { Self::Blob(b) }
}

// ─── Row ─────────────────────────────────────────────────────────────────────

/// An ordered column → value mapping.
///
/// Column names are unique under ASCII case folding, matching how SQL
/// identifiers compare. Inserting an existing name replaces its value in
/// place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
  columns: Vec<(String, Value)>,
}

impl Row {
  pub fn new() -> Self { Self::default() }

  pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
    let name = name.into();
    let value = value.into();
    match self
      .columns
      .iter_mut()
      .find(|(k, _)| k.eq_ignore_ascii_case(&name))
    {
      Some(slot) => slot.1 = value,
      None => self.columns.push((name, value)),
    }
  }

  pub fn get(&self, name: &str) -> Option<&Value> {
    self
      .columns
      .iter()
      .find(|(k, _)| k.eq_ignore_ascii_case(name))
      .map(|(_, v)| v)
  }

  pub fn contains(&self, name: &str) -> bool { self.get(name).is_some() }

  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.columns.iter().map(|(k, _)| k.as_str())
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
    self.columns.iter().map(|(k, v)| (k.as_str(), v))
  }

  pub fn len(&self) -> usize { self.columns.len() }

  pub fn is_empty(&self) -> bool { self.columns.is_empty() }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    let mut row = Row::new();
    for (k, v) in iter {
      row.insert(k, v);
    }
    row
  }
}

// ─── HTTP header encoding ────────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
struct HeaderPair {
  header: String,
  value:  String,
}

/// Encode HTTP headers as a JSON array of `{"header", "value"}` objects,
/// preserving order and repeats.
pub fn encode_http_headers(headers: &HttpHeaders) -> Result<String> {
  let pairs: Vec<HeaderPair> = headers
    .headers
    .iter()
    .map(|(h, v)| HeaderPair { header: h.clone(), value: v.clone() })
    .collect();
  Ok(serde_json::to_string(&pairs)?)
}

/// Inverse of [`encode_http_headers`].
pub fn decode_http_headers(s: &str) -> Result<Vec<(String, String)>> {
  let pairs: Vec<HeaderPair> = serde_json::from_str(s)?;
  Ok(pairs.into_iter().map(|p| (p.header, p.value)).collect())
}

// ─── Adapter ─────────────────────────────────────────────────────────────────

/// Which optional parts of a record go into its row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RowFlags {
  pub http_headers: bool,
  pub payload:      bool,
}

impl RowFlags {
  pub const PAYLOAD: Self = Self { http_headers: false, payload: true };
  pub const PAYLOAD_AND_HTTP_HEADERS: Self =
    Self { http_headers: true, payload: true };
}

/// A record plus the rows derived from it.
#[derive(Debug)]
pub struct RowAdapter {
  record:  WarcRecord,
  payload: Option<Vec<u8>>,
  memo:    HashMap<RowFlags, Row>,
}

impl RowAdapter {
  pub fn new(record: WarcRecord) -> Self {
    Self { record, payload: None, memo: HashMap::new() }
  }

  pub fn record(&self) -> &WarcRecord { &self.record }

  pub fn into_record(self) -> WarcRecord { self.record }

  /// Derive the row for `flags`, computing it at most once.
  ///
  /// Fails with [`crate::Error::StreamExhausted`] when the payload is
  /// requested but the content stream was drained elsewhere or cannot be
  /// read.
  pub fn to_row(&mut self, flags: RowFlags) -> Result<&Row> {
    if !self.memo.contains_key(&flags) {
      let row = self.build(flags)?;
      self.memo.insert(flags, row);
    }
    Ok(&self.memo[&flags])
  }

  fn payload(&mut self) -> Result<&[u8]> {
    if self.payload.is_none() {
      self.payload = Some(self.record.content_mut().read_all()?);
    }
    Ok(self.payload.as_deref().unwrap_or_default())
  }

  fn build(&mut self, flags: RowFlags) -> Result<Row> {
    let payload = if flags.payload {
      Some(self.payload()?.to_vec())
    } else {
      None
    };

    let mut row: Row = self
      .record
      .rec_headers()
      .iter()
      .map(|(k, v)| (k, Value::from(v)))
      .collect();

    if flags.http_headers {
      let value = match self.record.http_headers() {
        Some(h) => Value::Text(encode_http_headers(h)?),
        None => Value::Null,
      };
      row.insert(HTTP_HEADERS_COLUMN, value);
    }

    if let Some(bytes) = payload {
      row.insert(PAYLOAD_COLUMN, Value::Blob(bytes));
    }

    Ok(row)
  }
}
