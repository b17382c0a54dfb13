//! WARC record parser.
//!
//! Pipeline:
//!   BufRead
//!     └─ read_version()        → "WARC/1.1"
//!          └─ read_header_block() → WarcHeaders
//!               └─ read_block()   → Vec<u8> (exactly Content-Length bytes)
//!                    └─ split_http() → (Option<HttpHeaders>, payload)
//!                         └─ decode_body() → payload without transfer or
//!                                            content encoding

use std::io::{BufRead, Read};

use warcdb_core::record::{
  CONTENT_LENGTH, CONTENT_TYPE, ContentStream, HttpHeaders, RecordType,
  WARC_TYPE, WarcHeaders, WarcRecord,
};

use crate::{
  body::decode_body,
  error::{Error, Result},
};

// ─── Low-level helpers ───────────────────────────────────────────────────────

/// Strip a trailing `\n` or `\r\n`.
fn trim_eol(line: &[u8]) -> &[u8] {
  let line = line.strip_suffix(b"\n").unwrap_or(line);
  line.strip_suffix(b"\r").unwrap_or(line)
}

/// Split `name: value` lines, folding continuation lines (leading SP/HT)
/// into the previous value. Lines without a colon are reported through
/// `on_malformed`.
fn parse_fields<'a, I, F>(lines: I, mut on_malformed: F) -> Result<Vec<(String, String)>>
where
  I: IntoIterator<Item = &'a str>,
  F: FnMut(&str) -> Result<()>,
{
  let mut fields: Vec<(String, String)> = Vec::new();
  for line in lines {
    if line.starts_with(' ') || line.starts_with('\t') {
      if let Some((_, value)) = fields.last_mut() {
        if !value.is_empty() {
          value.push(' ');
        }
        value.push_str(line.trim());
        continue;
      }
      // else: leading continuation with no prior field
    }
    match line.split_once(':') {
      Some((name, value)) => {
        fields.push((name.trim().to_owned(), value.trim().to_owned()));
      }
      None => on_malformed(line)?,
    }
  }
  Ok(fields)
}

// ─── Record framing ──────────────────────────────────────────────────────────

/// Read the `WARC/x.y` line, skipping the blank lines that separate records.
/// Returns `None` at a clean end of input.
fn read_version<R: BufRead>(reader: &mut R) -> Result<Option<String>> {
  let mut line = Vec::new();
  loop {
    line.clear();
    if reader.read_until(b'\n', &mut line)? == 0 {
      return Ok(None);
    }
    let trimmed = trim_eol(&line);
    if trimmed.is_empty() {
      continue;
    }
    let version = String::from_utf8_lossy(trimmed).into_owned();
    if !version.starts_with("WARC/") {
      return Err(Error::MissingVersion(version));
    }
    return Ok(Some(version));
  }
}

fn read_header_block<R: BufRead>(reader: &mut R) -> Result<WarcHeaders> {
  let mut lines: Vec<String> = Vec::new();
  let mut line = Vec::new();
  loop {
    line.clear();
    if reader.read_until(b'\n', &mut line)? == 0 {
      return Err(Error::TruncatedHeaders);
    }
    let trimmed = trim_eol(&line);
    if trimmed.is_empty() {
      break;
    }
    lines.push(String::from_utf8_lossy(trimmed).into_owned());
  }

  let fields = parse_fields(lines.iter().map(String::as_str), |l| {
    Err(Error::MalformedHeader(l.to_owned()))
  })?;
  Ok(fields.into_iter().collect())
}

fn content_length(headers: &WarcHeaders) -> Result<u64> {
  let raw = headers
    .get(CONTENT_LENGTH)
    .ok_or(Error::MissingHeader(CONTENT_LENGTH))?;
  raw
    .trim()
    .parse()
    .map_err(|_| Error::InvalidContentLength(raw.to_owned()))
}

fn read_block<R: BufRead>(reader: &mut R, len: u64) -> Result<Vec<u8>> {
  let mut block = Vec::with_capacity(len.min(1 << 20) as usize);
  reader.by_ref().take(len).read_to_end(&mut block)?;
  let actual = block.len() as u64;
  if actual != len {
    return Err(Error::TruncatedBlock { expected: len, actual });
  }
  Ok(block)
}

// ─── HTTP envelope ───────────────────────────────────────────────────────────

fn carries_http(rec_type: &RecordType, headers: &WarcHeaders) -> bool {
  matches!(
    rec_type,
    RecordType::Request | RecordType::Response | RecordType::Revisit
  ) && headers
    .get(CONTENT_TYPE)
    .is_some_and(|ct| ct.trim().to_ascii_lowercase().starts_with("application/http"))
}

/// Locate the end of the HTTP header block: returns `(header_len, body_start)`.
fn find_header_end(block: &[u8]) -> Option<(usize, usize)> {
  let crlf = block.windows(4).position(|w| w == b"\r\n\r\n").map(|i| (i, i + 4));
  let lf = block.windows(2).position(|w| w == b"\n\n").map(|i| (i, i + 2));
  match (crlf, lf) {
    (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
    (a, b) => a.or(b),
  }
}

/// Separate an `application/http` block into its header list and body.
///
/// A block with no header terminator is not treated as HTTP; it is returned
/// whole as the payload.
pub(crate) fn split_http(block: Vec<u8>) -> (Option<HttpHeaders>, Vec<u8>) {
  let Some((header_len, body_start)) = find_header_end(&block) else {
    return (None, block);
  };

  let head = String::from_utf8_lossy(&block[..header_len]).into_owned();
  let mut lines = head.lines();
  let status_line = lines.next().unwrap_or_default().trim().to_owned();

  // Junk lines in HTTP headers are common in the wild; skip them.
  let headers = parse_fields(lines, |_| Ok(())).unwrap_or_default();

  let body = block[body_start..].to_vec();
  (Some(HttpHeaders { status_line, headers }), body)
}

// ─── Core parser ─────────────────────────────────────────────────────────────

/// Read the next record from `reader`, or `None` at end of input.
pub(crate) fn read_record<R: BufRead>(reader: &mut R) -> Result<Option<WarcRecord>> {
  let Some(version) = read_version(reader)? else {
    return Ok(None);
  };

  let headers = read_header_block(reader)?;
  let rec_type = headers
    .get(WARC_TYPE)
    .map(RecordType::parse)
    .ok_or(Error::MissingHeader(WARC_TYPE))?;
  let len = content_length(&headers)?;
  let block = read_block(reader, len)?;

  tracing::trace!(%version, %rec_type, len, "parsed record");

  let (http_headers, payload) = if carries_http(&rec_type, &headers) {
    match split_http(block) {
      (Some(http), body) => {
        let body = decode_body(&http, body);
        (Some(http), body)
      }
      (None, block) => (None, block),
    }
  } else {
    (None, block)
  };

  Ok(Some(WarcRecord::new(
    rec_type,
    headers,
    http_headers,
    ContentStream::from_bytes(payload),
  )))
}

// ─── Tests ───────────────────────────────────────────────────────────────────
