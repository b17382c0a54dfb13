//! SQLite backend for warcdb.
//!
//! Implements [`warcdb_core::store::RecordStore`] over a single
//! [`rusqlite::Connection`]: tables are created on first use, widened as new
//! WARC fields appear, and written with insert-or-ignore semantics.

mod encode;
mod schema;
mod store;
mod table;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
pub use table::{Column, TableForeignKey, TableHandle};
