//! Command-line ingestion of WARC archives into a warcdb SQLite file.
//!
//! The binary in `main.rs` is a thin shell over [`import::ingest`]; the
//! library half exists so the driver can be exercised from `tests/`.

pub mod config;
pub mod error;
pub mod import;

pub use error::{Error, Result};
