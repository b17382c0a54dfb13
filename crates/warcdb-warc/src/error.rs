//! Error types for the warcdb-warc parser.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("i/o error: {0}")]
  Io(#[from] std::io::Error),

  #[error("expected a WARC version line, found {0:?}")]
  MissingVersion(String),

  #[error("malformed header line: {0:?}")]
  MalformedHeader(String),

  #[error("archive ends inside a header block")]
  TruncatedHeaders,

  #[error("record is missing the {0} header")]
  MissingHeader(&'static str),

  #[error("invalid Content-Length: {0:?}")]
  InvalidContentLength(String),

  #[error("record block truncated: expected {expected} bytes, got {actual}")]
  TruncatedBlock { expected: u64, actual: u64 },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
