//! Minimal HTTP/1.1 server that supports HEAD and Range GET for integration
//! tests.
//!
//! Serves a single static body. HEAD responses carry `Content-Length`,
//! `Content-Type`, and (optionally) `Accept-Ranges: bytes` and a quoted
//! `ETag`; ranged GETs return 206 Partial Content. Failure modes are opt-in
//! through `RangeServerOptions`.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone)]
pub struct RangeServerOptions {
    /// `Content-Type` advertised on every response.
    pub content_type: String,
    /// Quoted `ETag` header value, if any (pass the bare hex; quotes are
    /// added on the wire).
    pub etag: Option<String>,
    /// If false, omit the `Accept-Ranges` header (simulates servers without
    /// range support).
    pub advertise_ranges: bool,
    /// If true, every GET fails with 500 (HEAD still works); exercises
    /// failover and exhaustion.
    pub fail_gets: bool,
}

impl Default for RangeServerOptions {
    fn default() -> Self {
        Self {
            content_type: "application/octet-stream".to_string(),
            etag: None,
            advertise_ranges: true,
            fail_gets: false,
        }
    }
}

/// Starts a server in a background thread serving `body`. Returns a URL to
/// the served file (the path is cosmetic; the server ignores it). The server
/// runs until the process exits.
pub fn start(body: Vec<u8>) -> String {
    start_with_options(body, RangeServerOptions::default())
}

/// Like `start` but with customized server behavior.
pub fn start_with_options(body: Vec<u8>, opts: RangeServerOptions) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let body = Arc::new(body);
    let opts = Arc::new(opts);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let body = Arc::clone(&body);
            let opts = Arc::clone(&opts);
            thread::spawn(move || handle(stream, &body, &opts));
        }
    });
    format!("http://127.0.0.1:{}/dummy.bin", port)
}

fn handle(mut stream: std::net::TcpStream, body: &[u8], opts: &RangeServerOptions) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let (method, range) = parse_request(request);
    let total = body.len() as u64;

    let mut extra = format!("Content-Type: {}\r\n", opts.content_type);
    if opts.advertise_ranges {
        extra.push_str("Accept-Ranges: bytes\r\n");
    }
    if let Some(etag) = &opts.etag {
        extra.push_str(&format!("ETag: \"{}\"\r\n", etag));
    }

    if method.eq_ignore_ascii_case("HEAD") {
        let response = format!("HTTP/1.1 200 OK\r\nContent-Length: {}\r\n{}\r\n", total, extra);
        let _ = stream.write_all(response.as_bytes());
        return;
    }

    if method.eq_ignore_ascii_case("GET") {
        if opts.fail_gets {
            let _ = stream
                .write_all(b"HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\n\r\n");
            return;
        }
        let (status, range_header, slice) = if let Some((start, end_incl)) = range {
            let start = start.min(total);
            let end_incl = end_incl.min(total.saturating_sub(1));
            if start > end_incl {
                (
                    "416 Range Not Satisfiable",
                    format!("Content-Range: bytes */{}\r\n", total),
                    &body[0..0],
                )
            } else {
                let start = start as usize;
                let end_excl = (end_incl + 1).min(total) as usize;
                let slice = body.get(start..end_excl).unwrap_or(&body[0..0]);
                (
                    "206 Partial Content",
                    format!("Content-Range: bytes {}-{}/{}\r\n", start, end_excl.saturating_sub(1), total),
                    slice,
                )
            }
        } else {
            ("200 OK", String::new(), body)
        };
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Length: {}\r\n{}{}\r\n",
            status,
            slice.len(),
            range_header,
            extra
        );
        let _ = stream.write_all(response.as_bytes());
        let _ = stream.write_all(slice);
        return;
    }

    let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\n\r\n");
}

/// Returns (method, optional (start, end_inclusive) for `Range: bytes=X-Y`).
fn parse_request(request: &str) -> (&str, Option<(u64, u64)>) {
    let mut method = "";
    let mut range = None;
    for line in request.lines() {
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        if method.is_empty() {
            method = line.split_whitespace().next().unwrap_or("");
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("range") {
                let value = value.trim();
                if value.to_lowercase().starts_with("bytes=") {
                    let part = value[6..].trim();
                    if let Some((a, b)) = part.split_once('-') {
                        let start = a.trim().parse::<u64>().unwrap_or(0);
                        let end = b.trim();
                        let end_incl = if end.is_empty() {
                            u64::MAX
                        } else {
                            end.parse::<u64>().unwrap_or(0)
                        };
                        range = Some((start, end_incl));
                    }
                }
            }
        }
    }
    (method, range)
}
