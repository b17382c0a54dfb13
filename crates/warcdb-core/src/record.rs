//! The WARC record model.
//!
//! A [`WarcRecord`] is what the container parser hands to the ingest path:
//! its record type, the WARC header block, the optional HTTP envelope, and a
//! one-shot [`ContentStream`] over the payload.

use std::{
  fmt,
  io::{Cursor, Read},
};

use crate::{Error, Result};

/// Header carrying the record's unique identifier; the primary key of every
/// record table.
pub const RECORD_ID: &str = "WARC-Record-ID";
pub const WARC_TYPE: &str = "WARC-Type";
pub const WARCINFO_ID: &str = "WARC-Warcinfo-ID";
pub const CONCURRENT_TO: &str = "WARC-Concurrent-To";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_LENGTH: &str = "Content-Length";

// ─── Record type ─────────────────────────────────────────────────────────────

/// The `WARC-Type` of a record.
///
/// Parsing never fails: values outside the WARC vocabulary land in
/// [`RecordType::Other`] and are rejected later by the router.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordType {
  Warcinfo,
  Request,
  Response,
  Metadata,
  Resource,
  Revisit,
  Conversion,
  Continuation,
  Other(String),
}

impl RecordType {
  pub fn parse(s: &str) -> Self {
    match s.trim().to_ascii_lowercase().as_str() {
      "warcinfo" => Self::Warcinfo,
      "request" => Self::Request,
      "response" => Self::Response,
      "metadata" => Self::Metadata,
      "resource" => Self::Resource,
      "revisit" => Self::Revisit,
      "conversion" => Self::Conversion,
      "continuation" => Self::Continuation,
      _ => Self::Other(s.trim().to_owned()),
    }
  }

  pub fn as_str(&self) -> &str {
    match self {
      Self::Warcinfo => "warcinfo",
      Self::Request => "request",
      Self::Response => "response",
      Self::Metadata => "metadata",
      Self::Resource => "resource",
      Self::Revisit => "revisit",
      Self::Conversion => "conversion",
      Self::Continuation => "continuation",
      Self::Other(s) => s,
    }
  }
}

impl fmt::Display for RecordType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Header blocks ───────────────────────────────────────────────────────────

fn lookup<'a>(pairs: &'a [(String, String)], name: &str) -> Option<&'a str> {
  pairs
    .iter()
    .rev()
    .find(|(k, _)| k.eq_ignore_ascii_case(name))
    .map(|(_, v)| v.as_str())
}

/// The WARC named fields of a record, in file order.
///
/// Names are compared ASCII case-insensitively. When a field repeats, lookups
/// return the last occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WarcHeaders {
  pairs: Vec<(String, String)>,
}

impl WarcHeaders {
  pub fn new() -> Self { Self::default() }

  pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
    self.pairs.push((name.into(), value.into()));
  }

  pub fn get(&self, name: &str) -> Option<&str> { lookup(&self.pairs, name) }

  pub fn record_id(&self) -> Option<&str> { self.get(RECORD_ID) }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
  }

  pub fn len(&self) -> usize { self.pairs.len() }

  pub fn is_empty(&self) -> bool { self.pairs.is_empty() }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for WarcHeaders {
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    Self {
      pairs: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
    }
  }
}

/// The HTTP envelope carried by `request` and `response` records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpHeaders {
  /// Request line (`GET / HTTP/1.1`) or status line (`HTTP/1.1 200 OK`).
  pub status_line: String,
  pub headers:     Vec<(String, String)>,
}

impl HttpHeaders {
  pub fn new<K, V>(
    status_line: impl Into<String>,
    headers: impl IntoIterator<Item = (K, V)>,
  ) -> Self
  where
    K: Into<String>,
    V: Into<String>,
  {
    Self {
      status_line: status_line.into(),
      headers:     headers
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect(),
    }
  }

  pub fn get(&self, name: &str) -> Option<&str> { lookup(&self.headers, name) }
}

// ─── Content stream ──────────────────────────────────────────────────────────

/// A single-consumption byte source over a record's payload.
pub struct ContentStream {
  inner: Option<Box<dyn Read + Send>>,
}

impl ContentStream {
  pub fn new(reader: impl Read + Send + 'static) -> Self {
    Self { inner: Some(Box::new(reader)) }
  }

  pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
    Self::new(Cursor::new(bytes.into()))
  }

  pub fn empty() -> Self { Self::from_bytes(Vec::new()) }

  pub fn is_drained(&self) -> bool { self.inner.is_none() }

  /// Drain the stream into memory.
  ///
  /// The stream is consumed even when reading fails; any later call returns
  /// [`Error::StreamExhausted`].
  pub fn read_all(&mut self) -> Result<Vec<u8>> {
    let mut reader = self
      .inner
      .take()
      .ok_or(Error::StreamExhausted { source: None })?;
    let mut buf = Vec::new();
    reader
      .read_to_end(&mut buf)
      .map_err(|e| Error::StreamExhausted { source: Some(e) })?;
    Ok(buf)
  }
}

impl fmt::Debug for ContentStream {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ContentStream")
      .field("drained", &self.is_drained())
      .finish()
  }
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// One parsed WARC record.
#[derive(Debug)]
pub struct WarcRecord {
  rec_type:     RecordType,
  rec_headers:  WarcHeaders,
  http_headers: Option<HttpHeaders>,
  content:      ContentStream,
}

impl WarcRecord {
  pub fn new(
    rec_type: RecordType,
    rec_headers: WarcHeaders,
    http_headers: Option<HttpHeaders>,
    content: ContentStream,
  ) -> Self {
    Self { rec_type, rec_headers, http_headers, content }
  }

  pub fn rec_type(&self) -> &RecordType { &self.rec_type }

  pub fn rec_headers(&self) -> &WarcHeaders { &self.rec_headers }

  pub fn http_headers(&self) -> Option<&HttpHeaders> {
    self.http_headers.as_ref()
  }

  pub fn record_id(&self) -> Option<&str> { self.rec_headers.record_id() }

  pub fn content(&self) -> &ContentStream { &self.content }

  pub fn content_mut(&mut self) -> &mut ContentStream { &mut self.content }
}
