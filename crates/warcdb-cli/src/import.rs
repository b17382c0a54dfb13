//! The ingestion driver: every record of every archive, in order, into one
//! [`WarcDb`].

use std::path::Path;

use tracing::{info, warn};
use warcdb_core::{WarcDb, store::RecordStore};

use crate::{Error, Result, config::ImportConfig};

/// What to do with a record whose type has no table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnsupportedPolicy {
  /// Stop the run with the classification error.
  #[default]
  Abort,
  /// Log the record and carry on.
  Skip,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptions {
  pub batch_size:  usize,
  pub unsupported: UnsupportedPolicy,
}

impl Default for ImportOptions {
  fn default() -> Self { ImportConfig::default().into() }
}

impl From<ImportConfig> for ImportOptions {
  fn from(cfg: ImportConfig) -> Self {
    Self {
      batch_size:  cfg.batch_size,
      unsupported: if cfg.skip_unsupported {
        UnsupportedPolicy::Skip
      } else {
        UnsupportedPolicy::Abort
      },
    }
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
  /// Records handed to the store, including ones already present.
  pub records: u64,
  /// Records dropped under [`UnsupportedPolicy::Skip`].
  pub skipped: u64,
}

/// Ingest every archive in `paths`, in the order given.
///
/// Each row is committed as soon as it is written, so a failure part-way
/// leaves earlier rows in place; re-running is safe because inserts ignore
/// records that are already stored.
pub fn ingest<S, P>(
  db: &mut WarcDb<S>,
  paths: &[P],
  options: &ImportOptions,
) -> Result<ImportSummary>
where
  S: RecordStore,
  P: AsRef<Path>,
{
  if options.batch_size > 0 {
    warn!("--batch-size has been temporarily disabled");
  }

  let mut summary = ImportSummary::default();
  for path in paths {
    let path = path.as_ref();
    let file = ingest_file(db, path, options)?;
    info!(
      path = %path.display(),
      records = file.records,
      skipped = file.skipped,
      "imported archive"
    );
    summary.records += file.records;
    summary.skipped += file.skipped;
  }

  info!(
    records = summary.records,
    skipped = summary.skipped,
    inserted = db.stats().inserted(),
    ignored = db.stats().ignored(),
    "import finished"
  );
  Ok(summary)
}

fn ingest_file<S: RecordStore>(
  db: &mut WarcDb<S>,
  path: &Path,
  options: &ImportOptions,
) -> Result<ImportSummary> {
  let records = warcdb_warc::open(path).map_err(|source| Error::Open {
    path: path.to_owned(),
    source,
  })?;

  let mut summary = ImportSummary::default();
  for record in records {
    let record = record.map_err(|source| Error::Warc {
      path: path.to_owned(),
      source,
    })?;

    match db.add(record) {
      Ok(_) => summary.records += 1,
      Err(warcdb_core::Error::UnsupportedRecordType(rec_type))
        if options.unsupported == UnsupportedPolicy::Skip =>
      {
        warn!(%rec_type, path = %path.display(), "skipping unsupported record");
        summary.skipped += 1;
      }
      Err(e) => return Err(e.into()),
    }
  }
  Ok(summary)
}
