//! Record builders shared by unit tests.

use uuid::Uuid;

use crate::record::{
  ContentStream, HttpHeaders, RecordType, WarcHeaders, WarcRecord,
};

pub(crate) fn new_id() -> String { format!("<urn:uuid:{}>", Uuid::new_v4()) }

/// Build a record with a fresh id, the standard WARC fields and `extra`.
pub(crate) fn record(
  rec_type: RecordType,
  extra: &[(&str, &str)],
  payload: &[u8],
) -> WarcRecord {
  record_with_id(rec_type, &new_id(), extra, payload)
}

pub(crate) fn record_with_id(
  rec_type: RecordType,
  id: &str,
  extra: &[(&str, &str)],
  payload: &[u8],
) -> WarcRecord {
  let mut headers = WarcHeaders::new();
  headers.push("WARC-Type", rec_type.as_str());
  headers.push("WARC-Record-ID", id);
  headers.push("WARC-Date", "2024-06-01T12:00:00Z");
  headers.push("Content-Length", payload.len().to_string());
  for (k, v) in extra {
    headers.push(*k, *v);
  }
  WarcRecord::new(rec_type, headers, None, ContentStream::from_bytes(payload))
}

pub(crate) fn record_with_http(
  rec_type: RecordType,
  status_line: &str,
  http: &[(&str, &str)],
  payload: &[u8],
) -> WarcRecord {
  let base = record(rec_type, &[("Content-Type", "application/http")], payload);
  let rec_type = base.rec_type().clone();
  let headers = base.rec_headers().clone();
  WarcRecord::new(
    rec_type,
    headers,
    Some(HttpHeaders::new(status_line, http.iter().copied())),
    ContentStream::from_bytes(payload),
  )
}
