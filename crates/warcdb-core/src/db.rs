//! [`WarcDb`]: the record ingest entry point over any [`RecordStore`].

use std::collections::BTreeMap;

use tracing::debug;

use crate::{
  Error, Result,
  conversion::COLUMN_TYPES,
  record::{RECORD_ID, WarcRecord},
  route,
  row::RowAdapter,
  store::{InsertOutcome, InsertSpec, OnConflict, RecordStore},
};

// ─── Stats ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableStats {
  pub inserted: u64,
  pub ignored:  u64,
}

/// Per-table insert counters for one [`WarcDb`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestStats {
  tables: BTreeMap<&'static str, TableStats>,
}

impl IngestStats {
  fn record(&mut self, table: &'static str, outcome: InsertOutcome) {
    let entry = self.tables.entry(table).or_default();
    match outcome {
      InsertOutcome::Inserted => entry.inserted += 1,
      InsertOutcome::Ignored => entry.ignored += 1,
    }
  }

  pub fn table(&self, table: &str) -> TableStats {
    self.tables.get(table).copied().unwrap_or_default()
  }

  pub fn inserted(&self) -> u64 { self.tables.values().map(|t| t.inserted).sum() }

  pub fn ignored(&self) -> u64 { self.tables.values().map(|t| t.ignored).sum() }

  pub fn iter(&self) -> impl Iterator<Item = (&'static str, TableStats)> + '_ {
    self.tables.iter().map(|(k, v)| (*k, *v))
  }
}

// ─── WarcDb ──────────────────────────────────────────────────────────────────

/// Writes WARC records into a [`RecordStore`], one row per record.
///
/// Each record is classified by type, flattened into a row carrying the
/// parts its route asks for, and inserted with insert-or-ignore semantics
/// keyed on `WARC-Record-ID`. Re-adding a record that is already stored is a
/// no-op.
pub struct WarcDb<S> {
  store: S,
  stats: IngestStats,
}

impl<S: RecordStore> WarcDb<S> {
  pub fn new(store: S) -> Self { Self { store, stats: IngestStats::default() } }

  pub fn store(&self) -> &S { &self.store }

  pub fn into_store(self) -> S { self.store }

  pub fn stats(&self) -> &IngestStats { &self.stats }

  /// Store one record. Returns `self` so calls can be chained.
  ///
  /// Unsupported record types fail with [`Error::UnsupportedRecordType`]
  /// before anything is written.
  pub fn add(&mut self, record: WarcRecord) -> Result<&mut Self> {
    let route = route::route(record.rec_type())?;
    if record.record_id().is_none() {
      return Err(Error::MissingRecordId);
    }

    let mut adapter = RowAdapter::new(record);
    let row = adapter.to_row(route.flags)?;

    let spec = InsertSpec {
      primary_key:  RECORD_ID,
      foreign_keys: route.foreign_keys,
      alter:        true,
      on_conflict:  OnConflict::Ignore,
      column_types: COLUMN_TYPES,
    };

    let outcome = self
      .store
      .insert(route.table, row, &spec)
      .map_err(|e| Error::Store(Box::new(e)))?;

    debug!(
      table = route.table,
      record_id = adapter.record().record_id().unwrap_or_default(),
      ?outcome,
      "stored record"
    );
    self.stats.record(route.table, outcome);
    Ok(self)
  }
}
