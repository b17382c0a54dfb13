//! Decoding of HTTP message bodies.
//!
//! The stored payload is the entity as a client would see it: chunked
//! transfer framing is removed and `gzip`/`deflate` content encodings are
//! inflated. A body that fails to decode is kept as raw bytes.

use std::io::Read;

use flate2::read::{DeflateDecoder, MultiGzDecoder, ZlibDecoder};
use tracing::debug;
use warcdb_core::record::HttpHeaders;

pub(crate) fn decode_body(headers: &HttpHeaders, body: Vec<u8>) -> Vec<u8> {
  let chunked = headers
    .get("Transfer-Encoding")
    .is_some_and(|te| te.to_ascii_lowercase().contains("chunked"));
  let body = if chunked {
    match dechunk(&body) {
      Some(decoded) => decoded,
      None => {
        debug!("malformed chunked body; keeping raw bytes");
        body
      }
    }
  } else {
    body
  };

  let Some(encoding) = headers.get("Content-Encoding") else {
    return body;
  };
  let encoding = encoding.trim().to_ascii_lowercase();
  match decompress(&encoding, &body) {
    Some(decoded) => decoded,
    None => {
      debug!(%encoding, "body did not decode; keeping raw bytes");
      body
    }
  }
}

fn skip_eol(b: &[u8]) -> &[u8] {
  if let Some(rest) = b.strip_prefix(b"\r\n") {
    rest
  } else if let Some(rest) = b.strip_prefix(b"\n") {
    rest
  } else {
    b
  }
}

/// Strip `Transfer-Encoding: chunked` framing. Trailers are dropped; a body
/// that ends without the zero-size chunk keeps what was read.
fn dechunk(mut rest: &[u8]) -> Option<Vec<u8>> {
  let mut out = Vec::with_capacity(rest.len());
  loop {
    let eol = rest.iter().position(|&b| b == b'\n')?;
    let line = std::str::from_utf8(&rest[..eol]).ok()?;
    let size = line.split(';').next().unwrap_or_default().trim();
    let size = usize::from_str_radix(size, 16).ok()?;
    rest = &rest[eol + 1..];
    if size == 0 {
      return Some(out);
    }

    out.extend_from_slice(rest.get(..size)?);
    rest = skip_eol(&rest[size..]);
    if rest.is_empty() {
      return Some(out);
    }
  }
}

/// Inflate `body` for a `Content-Encoding`; `None` for unknown encodings or
/// corrupt data.
fn decompress(encoding: &str, body: &[u8]) -> Option<Vec<u8>> {
  let mut out = Vec::new();
  let result = match encoding {
    "" | "identity" => return Some(body.to_vec()),
    "gzip" | "x-gzip" => MultiGzDecoder::new(body).read_to_end(&mut out),
    // Servers send both zlib-wrapped and raw deflate streams.
    "deflate" => match ZlibDecoder::new(body).read_to_end(&mut out) {
      Ok(n) => Ok(n),
      Err(_) => {
        out.clear();
        DeflateDecoder::new(body).read_to_end(&mut out)
      }
    },
    _ => return None,
  };
  result.ok().map(|_| out)
}
