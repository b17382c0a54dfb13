//! End-to-end runs of the ingestion driver over archives on disk.

use std::{
  fs,
  io::Write as _,
  path::{Path, PathBuf},
};

use flate2::{Compression, write::GzEncoder};
use tempfile::TempDir;
use warcdb_cli::{
  Error,
  import::{ImportOptions, ImportSummary, UnsupportedPolicy, ingest},
};
use warcdb_core::{
  Error as CoreError, WarcDb,
  record::RecordType,
  row::{Value, decode_http_headers},
};
use warcdb_store_sqlite::SqliteStore;

const INFO: &str = "<urn:uuid:00000000-0000-4000-8000-000000000001>";
const REQUEST: &str = "<urn:uuid:00000000-0000-4000-8000-000000000002>";
const RESPONSE: &str = "<urn:uuid:00000000-0000-4000-8000-000000000003>";
const METADATA: &str = "<urn:uuid:00000000-0000-4000-8000-000000000004>";
const REVISIT: &str = "<urn:uuid:00000000-0000-4000-8000-000000000005>";

// ─── Fixtures ────────────────────────────────────────────────────────────────

fn record(rec_type: &str, id: &str, extra: &[(&str, &str)], block: &[u8]) -> Vec<u8> {
  let mut out = format!(
    "WARC/1.1\r\nWARC-Type: {rec_type}\r\nWARC-Record-ID: {id}\r\n\
     WARC-Date: 2024-06-01T12:00:00Z\r\n"
  );
  for (k, v) in extra {
    out.push_str(&format!("{k}: {v}\r\n"));
  }
  out.push_str(&format!("Content-Length: {}\r\n\r\n", block.len()));

  let mut bytes = out.into_bytes();
  bytes.extend_from_slice(block);
  bytes.extend_from_slice(b"\r\n\r\n");
  bytes
}

/// warcinfo → request → response → metadata, fully linked.
fn capture() -> Vec<u8> {
  [
    record("warcinfo", INFO, &[], b"software: test\r\nformat: WARC File Format 1.1\r\n"),
    record(
      "request",
      REQUEST,
      &[
        ("WARC-Warcinfo-ID", INFO),
        ("WARC-Target-URI", "http://example.com/"),
        ("Content-Type", "application/http; msgtype=request"),
      ],
      b"GET / HTTP/1.1\r\nHost: example.com\r\nUser-Agent: warcdb-test\r\n\r\n",
    ),
    record(
      "response",
      RESPONSE,
      &[
        ("WARC-Warcinfo-ID", INFO),
        ("WARC-Concurrent-To", REQUEST),
        ("WARC-Target-URI", "http://example.com/"),
        ("Content-Type", "application/http; msgtype=response"),
      ],
      b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nX-Trace: a\r\n\r\nhello",
    ),
    record(
      "metadata",
      METADATA,
      &[("WARC-Warcinfo-ID", INFO), ("WARC-Concurrent-To", RESPONSE)],
      b"via: http://example.com/\r\n",
    ),
  ]
  .concat()
}

fn revisit() -> Vec<u8> {
  record(
    "revisit",
    REVISIT,
    &[
      ("WARC-Refers-To", RESPONSE),
      ("WARC-Profile", "http://netpreserve.org/warc/1.1/revisit/identical-payload-digest"),
    ],
    b"",
  )
}

fn write(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
  let path = dir.path().join(name);
  fs::write(&path, bytes).unwrap();
  path
}

fn open_db(path: &Path) -> WarcDb<SqliteStore> { WarcDb::new(SqliteStore::open(path).unwrap()) }

fn count(db: &WarcDb<SqliteStore>, table: &str) -> u64 {
  db.store().table(table).count().unwrap()
}

fn run(db: &mut WarcDb<SqliteStore>, paths: &[PathBuf]) -> ImportSummary {
  ingest(db, paths, &ImportOptions::default()).unwrap()
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[test]
fn each_type_lands_in_its_own_table() {
  let dir = TempDir::new().unwrap();
  let warc = write(&dir, "capture.warc", &capture());
  let mut db = open_db(&dir.path().join("out.db"));

  let summary = run(&mut db, &[warc]);

  assert_eq!(summary, ImportSummary { records: 4, skipped: 0 });
  for table in ["warcinfo", "request", "response", "metadata"] {
    assert_eq!(count(&db, table), 1, "{table}");
  }
  assert!(!db.store().table("resource").exists().unwrap());
}

#[test]
fn importing_twice_changes_nothing() {
  let dir = TempDir::new().unwrap();
  let warc = write(&dir, "capture.warc", &capture());
  let db_path = dir.path().join("out.db");

  {
    let mut db = open_db(&db_path);
    run(&mut db, std::slice::from_ref(&warc));
  }

  let mut db = open_db(&db_path);
  let summary = run(&mut db, &[warc]);
  assert_eq!(summary.records, 4);
  assert_eq!(db.stats().inserted(), 0);
  assert_eq!(db.stats().ignored(), 4);
  assert_eq!(db.store().record_count().unwrap(), 4);
}

#[test]
fn record_chain_joins_back_to_warcinfo() {
  let dir = TempDir::new().unwrap();
  let warc = write(&dir, "capture.warc", &capture());
  let mut db = open_db(&dir.path().join("out.db"));
  run(&mut db, &[warc]);

  let info: String = db
    .store()
    .connection()
    .query_row(
      r#"SELECT w."WARC-Record-ID"
           FROM metadata m
           JOIN response rs ON m."WARC-Concurrent-To" = rs."WARC-Record-ID"
           JOIN request rq  ON rs."WARC-Concurrent-To" = rq."WARC-Record-ID"
           JOIN warcinfo w  ON rq."WARC-Warcinfo-ID"  = w."WARC-Record-ID""#,
      [],
      |r| r.get(0),
    )
    .unwrap();
  assert_eq!(info, INFO);
}

#[test]
fn references_may_arrive_before_their_target() {
  let dir = TempDir::new().unwrap();
  // The response names a warcinfo that only appears in the second file.
  let first = write(
    &dir,
    "1.warc",
    &record("response", RESPONSE, &[("WARC-Warcinfo-ID", INFO)], b"late"),
  );
  let second = write(&dir, "2.warc", &record("warcinfo", INFO, &[], b"x: y\r\n"));
  let mut db = open_db(&dir.path().join("out.db"));

  run(&mut db, &[first, second]);

  assert_eq!(count(&db, "response"), 1);
  assert_eq!(count(&db, "warcinfo"), 1);
}

#[test]
fn http_response_is_split_into_headers_and_body() {
  let dir = TempDir::new().unwrap();
  let warc = write(&dir, "capture.warc", &capture());
  let mut db = open_db(&dir.path().join("out.db"));
  run(&mut db, &[warc]);

  let row = db.store().table("response").get(RESPONSE).unwrap().unwrap();
  assert_eq!(row.get("payload"), Some(&Value::Blob(b"hello".to_vec())));

  let headers = row.get("http_headers").and_then(Value::as_text).unwrap();
  assert_eq!(
    decode_http_headers(headers).unwrap(),
    vec![
      ("Content-Type".to_owned(), "text/plain".to_owned()),
      ("X-Trace".to_owned(), "a".to_owned()),
    ]
  );
  assert_eq!(row.get("Content-Length"), Some(&Value::Integer(62)));
}

#[test]
fn encoded_http_bodies_are_stored_decoded() {
  let dir = TempDir::new().unwrap();
  let mut gz = GzEncoder::new(Vec::new(), Compression::default());
  gz.write_all(b"inflated body").unwrap();
  let mut gzip_http = b"HTTP/1.1 200 OK\r\nContent-Encoding: gzip\r\n\r\n".to_vec();
  gzip_http.extend(gz.finish().unwrap());

  let http = [("Content-Type", "application/http; msgtype=response")];
  let archive = [
    record(
      "response",
      RESPONSE,
      &http,
      b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n5\r\nhello\r\n0\r\n\r\n",
    ),
    record("response", "<urn:uuid:gz>", &http, &gzip_http),
  ]
  .concat();
  let warc = write(&dir, "encoded.warc", &archive);
  let mut db = open_db(&dir.path().join("out.db"));

  run(&mut db, &[warc]);

  let table = db.store().table("response");
  let chunked = table.get(RESPONSE).unwrap().unwrap();
  assert_eq!(chunked.get("payload"), Some(&Value::Blob(b"hello".to_vec())));
  let gzipped = table.get("<urn:uuid:gz>").unwrap().unwrap();
  assert_eq!(gzipped.get("payload"), Some(&Value::Blob(b"inflated body".to_vec())));
}

#[test]
fn irregular_warc_date_does_not_stop_the_import() {
  let dir = TempDir::new().unwrap();
  // Same record shape, but a date without a zone.
  let odd = String::from_utf8(record("resource", "<urn:uuid:odd>", &[], b"a"))
    .unwrap()
    .replace("2024-06-01T12:00:00Z", "2024-06-01T12:00:00")
    .into_bytes();
  let archive = [
    record("warcinfo", INFO, &[], b"x: y\r\n"),
    odd,
    record("resource", "<urn:uuid:ok>", &[], b"b"),
  ]
  .concat();
  let warc = write(&dir, "dates.warc", &archive);
  let mut db = open_db(&dir.path().join("out.db"));

  let summary = run(&mut db, &[warc]);

  assert_eq!(summary.records, 3);
  assert_eq!(db.store().record_count().unwrap(), 3);
  let row = db.store().table("resource").get("<urn:uuid:odd>").unwrap().unwrap();
  assert_eq!(row.get("WARC-Date").and_then(Value::as_text), Some("2024-06-01T12:00:00"));
}

#[test]
fn gzipped_archives_are_read() {
  let dir = TempDir::new().unwrap();
  let mut gz = Vec::new();
  for member in [capture(), record("resource", "<urn:uuid:r>", &[], b"\x00\x01\x02")] {
    let mut enc = GzEncoder::new(Vec::new(), Compression::default());
    enc.write_all(&member).unwrap();
    gz.extend(enc.finish().unwrap());
  }
  let warc = write(&dir, "capture.warc.gz", &gz);
  let mut db = open_db(&dir.path().join("out.db"));

  let summary = run(&mut db, &[warc]);

  assert_eq!(summary.records, 5);
  let resource = db.store().table("resource").get("<urn:uuid:r>").unwrap().unwrap();
  assert_eq!(resource.get("payload"), Some(&Value::Blob(vec![0, 1, 2])));
}

#[test]
fn revisit_aborts_the_run_by_default() {
  let dir = TempDir::new().unwrap();
  let warc = write(&dir, "capture.warc", &[capture(), revisit()].concat());
  let mut db = open_db(&dir.path().join("out.db"));

  let err = ingest(&mut db, &[warc], &ImportOptions::default()).unwrap_err();

  assert!(matches!(
    err,
    Error::Ingest(CoreError::UnsupportedRecordType(RecordType::Revisit))
  ));
  // Rows before the revisit stay committed.
  assert_eq!(db.store().record_count().unwrap(), 4);
}

#[test]
fn revisit_is_skipped_when_asked() {
  let dir = TempDir::new().unwrap();
  let warc = write(&dir, "capture.warc", &[revisit(), capture()].concat());
  let mut db = open_db(&dir.path().join("out.db"));
  let options = ImportOptions {
    unsupported: UnsupportedPolicy::Skip,
    ..ImportOptions::default()
  };

  let summary = ingest(&mut db, &[warc], &options).unwrap();

  assert_eq!(summary, ImportSummary { records: 4, skipped: 1 });
  assert_eq!(db.store().record_count().unwrap(), 4);
}

#[test]
fn missing_archive_is_an_open_error() {
  let dir = TempDir::new().unwrap();
  let mut db = open_db(&dir.path().join("out.db"));

  let err = ingest(&mut db, &[dir.path().join("absent.warc")], &ImportOptions::default())
    .unwrap_err();

  assert!(matches!(err, Error::Open { .. }));
}

#[test]
fn truncated_archive_keeps_earlier_rows() {
  let dir = TempDir::new().unwrap();
  let mut bytes = capture();
  bytes.extend_from_slice(b"WARC/1.1\r\nWARC-Type: resource\r\nContent-Length: 100\r\n\r\nshort");
  let warc = write(&dir, "broken.warc", &bytes);
  let mut db = open_db(&dir.path().join("out.db"));

  let err = ingest(&mut db, &[warc], &ImportOptions::default()).unwrap_err();

  assert!(matches!(err, Error::Warc { .. }));
  assert_eq!(db.store().record_count().unwrap(), 4);
}
