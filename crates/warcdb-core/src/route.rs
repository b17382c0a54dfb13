//! Record type → destination table dispatch.
//!
//! The whole routing policy is the [`ROUTES`] table: which table a record
//! type lands in, which optional parts of the record its row carries, and
//! which foreign keys link it to the rest of the capture.

use crate::{
  Error, Result,
  record::{CONCURRENT_TO, RECORD_ID, RecordType, WARCINFO_ID},
  row::RowFlags,
};

/// A logical `column → ref_table.ref_column` edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKey {
  pub column:     &'static str,
  pub ref_table:  &'static str,
  pub ref_column: &'static str,
}

impl ForeignKey {
  const fn to(column: &'static str, ref_table: &'static str) -> Self {
    Self { column, ref_table, ref_column: RECORD_ID }
  }
}

/// Where and how one record type is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
  pub rec_type:     RecordType,
  pub table:        &'static str,
  pub flags:        RowFlags,
  pub foreign_keys: &'static [ForeignKey],
}

const TO_WARCINFO: ForeignKey = ForeignKey::to(WARCINFO_ID, "warcinfo");

pub static ROUTES: [Route; 5] = [
  Route {
    rec_type:     RecordType::Warcinfo,
    table:        "warcinfo",
    flags:        RowFlags::PAYLOAD,
    foreign_keys: &[],
  },
  Route {
    rec_type:     RecordType::Request,
    table:        "request",
    flags:        RowFlags::PAYLOAD_AND_HTTP_HEADERS,
    foreign_keys: &[TO_WARCINFO],
  },
  Route {
    rec_type:     RecordType::Response,
    table:        "response",
    flags:        RowFlags::PAYLOAD_AND_HTTP_HEADERS,
    foreign_keys: &[TO_WARCINFO, ForeignKey::to(CONCURRENT_TO, "request")],
  },
  Route {
    rec_type:     RecordType::Metadata,
    table:        "metadata",
    flags:        RowFlags::PAYLOAD,
    foreign_keys: &[TO_WARCINFO, ForeignKey::to(CONCURRENT_TO, "response")],
  },
  Route {
    rec_type:     RecordType::Resource,
    table:        "resource",
    flags:        RowFlags::PAYLOAD,
    foreign_keys: &[TO_WARCINFO, ForeignKey::to(CONCURRENT_TO, "metadata")],
  },
];

/// Names of every table a record can be routed to.
pub fn tables() -> impl Iterator<Item = &'static str> {
  ROUTES.iter().map(|r| r.table)
}

/// Select the route for `rec_type`.
pub fn route(rec_type: &RecordType) -> Result<&'static Route> {
  ROUTES
    .iter()
    .find(|r| r.rec_type == *rec_type)
    .ok_or_else(|| Error::UnsupportedRecordType(rec_type.clone()))
}
