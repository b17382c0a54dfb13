//! Core types for ingesting WARC records into a relational store.
//!
//! This crate is deliberately free of database and file-format dependencies.
//! The container parser (`warcdb-warc`) produces [`record::WarcRecord`]s and
//! storage backends (`warcdb-store-sqlite`) implement [`store::RecordStore`].

pub mod conversion;
pub mod db;
pub mod error;
pub mod record;
pub mod route;
pub mod row;
pub mod store;

pub use db::{IngestStats, WarcDb};
pub use error::{Error, Result};

#[cfg(test)]
pub(crate) mod test_helpers;
