//! Error types for `warcdb-cli`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("cannot open {}: {source}", path.display())]
  Open {
    path:   PathBuf,
    #[source]
    source: warcdb_warc::Error,
  },

  #[error("malformed archive {}: {source}", path.display())]
  Warc {
    path:   PathBuf,
    #[source]
    source: warcdb_warc::Error,
  },

  #[error(transparent)]
  Ingest(#[from] warcdb_core::Error),

  #[error("configuration error: {0}")]
  Config(#[from] config::ConfigError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
