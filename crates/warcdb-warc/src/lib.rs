//! WARC 1.0 / 1.1 container reader for warcdb.
//!
//! Turns a byte stream into a sequence of
//! [`warcdb_core::record::WarcRecord`]s, parsed one record at a time. Pure
//! synchronous `std::io`; no database dependencies. Gzip-member archives
//! (`.warc.gz`) are detected by their magic bytes and decompressed
//! transparently. HTTP bodies have chunked framing and `gzip`/`deflate`
//! content encoding removed.
//!
//! # Quick start
//!
//! ```no_run
//! let records = warcdb_warc::open("crawl.warc.gz").unwrap();
//! for record in records {
//!   let record = record.unwrap();
//!   println!("{} {:?}", record.rec_type(), record.record_id());
//! }
//! ```

mod body;
pub mod error;
mod parse;

use std::{
  fs::File,
  io::{BufRead, BufReader, Read},
  path::Path,
};

pub use error::{Error, Result};
use flate2::read::MultiGzDecoder;
use warcdb_core::record::WarcRecord;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Boxed reader handed out by [`open`] and [`from_reader`].
pub type ArchiveReader = Box<dyn BufRead + Send>;

// ─── Iterator ────────────────────────────────────────────────────────────────

/// Yields the records of an archive, in file order.
///
/// Records are read one at a time as the iterator advances, but each
/// record's block is read into memory in full before it is yielded; the
/// record's content stream reads from that buffer.
///
/// Iteration stops after the first error; the underlying stream cannot be
/// resynchronised.
pub struct ArchiveIterator<R> {
  reader: R,
  read:   u64,
  done:   bool,
}

impl<R: BufRead> ArchiveIterator<R> {
  pub fn new(reader: R) -> Self { Self { reader, read: 0, done: false } }

  /// Number of records yielded so far.
  pub fn records_read(&self) -> u64 { self.read }
}

impl<R: BufRead> Iterator for ArchiveIterator<R> {
  type Item = Result<WarcRecord>;

  fn next(&mut self) -> Option<Self::Item> {
    if self.done {
      return None;
    }
    match parse::read_record(&mut self.reader) {
      Ok(Some(record)) => {
        self.read += 1;
        Some(Ok(record))
      }
      Ok(None) => {
        self.done = true;
        None
      }
      Err(e) => {
        self.done = true;
        Some(Err(e))
      }
    }
  }
}

// ─── Public API ──────────────────────────────────────────────────────────────

/// Wrap `reader`, decompressing it first when it starts with a gzip header.
pub fn from_reader(
  reader: impl Read + Send + 'static,
) -> Result<ArchiveIterator<ArchiveReader>> {
  let mut buffered = BufReader::new(reader);
  let gzipped = buffered.fill_buf()?.starts_with(&GZIP_MAGIC);
  let reader: ArchiveReader = if gzipped {
    Box::new(BufReader::new(MultiGzDecoder::new(buffered)))
  } else {
    Box::new(buffered)
  };
  Ok(ArchiveIterator::new(reader))
}

/// Open the archive at `path`. The file is closed when the iterator is
/// dropped.
pub fn open(path: impl AsRef<Path>) -> Result<ArchiveIterator<ArchiveReader>> {
  from_reader(File::open(path)?)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
