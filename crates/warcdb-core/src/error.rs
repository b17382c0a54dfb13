//! Error types for `warcdb-core`.

use thiserror::Error;

use crate::record::RecordType;

#[derive(Debug, Error)]
pub enum Error {
  #[error(
    "record type <{0}> is not supported; only [warcinfo, request, response, \
     metadata, resource] are"
  )]
  UnsupportedRecordType(RecordType),

  #[error("record has no WARC-Record-ID header")]
  MissingRecordId,

  #[error("content stream exhausted or unreadable")]
  StreamExhausted {
    #[source]
    source: Option<std::io::Error>,
  },

  #[error("serialization error: {0}")]
  Json(#[from] serde_json::Error),

  /// The storage backend rejected a row.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
