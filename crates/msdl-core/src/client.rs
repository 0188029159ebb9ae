//! HTTP client facade over curl easy handles.
//!
//! One handle per request; connection reuse is left to libcurl. Every request
//! carries the configured timeout, follows redirects transparently, and
//! honors the shared abort flag through curl's progress callback so in-flight
//! transfers surrender promptly.

use std::str;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Error from a single HTTP attempt.
///
/// The chunk scheduler treats every variant except `Aborted` as transient
/// (failover material); the probe phase surfaces it as a transport error.
#[derive(Debug)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection, DNS, etc.).
    Curl(curl::Error),
    /// Response had an unexpected HTTP status.
    Http(u32),
    /// Body length did not match the requested range.
    Body { expected: u64, received: u64 },
    /// Transfer was stopped by the abort flag.
    Aborted,
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Curl(e) => write!(f, "{}", e),
            FetchError::Http(code) => write!(f, "HTTP {}", code),
            FetchError::Body { expected, received } => {
                write!(f, "body length mismatch: expected {} bytes, got {}", expected, received)
            }
            FetchError::Aborted => write!(f, "transfer aborted"),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Curl(e) => Some(e),
            _ => None,
        }
    }
}

/// Response to a HEAD request: status plus the raw header lines of the final
/// response (redirect hops are discarded).
#[derive(Debug)]
pub struct HeadResponse {
    pub status: u32,
    pub header_lines: Vec<String>,
}

/// Response to a ranged GET: status plus the full body.
#[derive(Debug)]
pub struct RangeResponse {
    pub status: u32,
    pub body: Vec<u8>,
}

/// Shared, reentrant HTTP client. Cheap to clone; holds only configuration.
#[derive(Debug, Clone)]
pub struct HttpClient {
    timeout: Duration,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Issues a HEAD request and returns the final response's status and
    /// header lines. Status handling is the caller's concern.
    pub fn head(&self, url: &str, abort: &AtomicBool) -> Result<HeadResponse, FetchError> {
        let mut header_lines: Vec<String> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url).map_err(FetchError::Curl)?;
        easy.nobody(true).map_err(FetchError::Curl)?;
        easy.follow_location(true).map_err(FetchError::Curl)?;
        easy.timeout(self.timeout).map_err(FetchError::Curl)?;
        easy.progress(true).map_err(FetchError::Curl)?;

        {
            let mut transfer = easy.transfer();
            transfer
                .header_function(|data| {
                    if let Ok(s) = str::from_utf8(data) {
                        let line = s.trim_end();
                        // libcurl emits one header block per redirect hop;
                        // clear on each status line to keep only the last.
                        if line.starts_with("HTTP/") {
                            header_lines.clear();
                        }
                        header_lines.push(line.to_string());
                    }
                    true
                })
                .map_err(FetchError::Curl)?;
            transfer
                .progress_function(|_, _, _, _| !abort.load(Ordering::Relaxed))
                .map_err(FetchError::Curl)?;
            transfer.perform().map_err(|e| {
                if e.is_aborted_by_callback() {
                    FetchError::Aborted
                } else {
                    FetchError::Curl(e)
                }
            })?;
        }

        let status = easy.response_code().map_err(FetchError::Curl)?;
        Ok(HeadResponse { status, header_lines })
    }

    /// Issues a GET with `Range: bytes=offset-end_inclusive` and returns the
    /// status and body. The body is buffered whole; chunk sizes are bounded
    /// by the planner.
    pub fn get_range(
        &self,
        url: &str,
        offset: u64,
        end_inclusive: u64,
        abort: &AtomicBool,
    ) -> Result<RangeResponse, FetchError> {
        let mut body: Vec<u8> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url).map_err(FetchError::Curl)?;
        easy.follow_location(true).map_err(FetchError::Curl)?;
        easy.timeout(self.timeout).map_err(FetchError::Curl)?;
        easy.progress(true).map_err(FetchError::Curl)?;
        easy.range(&format!("{}-{}", offset, end_inclusive))
            .map_err(FetchError::Curl)?;

        {
            let mut transfer = easy.transfer();
            transfer
                .write_function(|data| {
                    body.extend_from_slice(data);
                    Ok(data.len())
                })
                .map_err(FetchError::Curl)?;
            transfer
                .progress_function(|_, _, _, _| !abort.load(Ordering::Relaxed))
                .map_err(FetchError::Curl)?;
            transfer.perform().map_err(|e| {
                if e.is_aborted_by_callback() {
                    FetchError::Aborted
                } else {
                    FetchError::Curl(e)
                }
            })?;
        }

        let status = easy.response_code().map_err(FetchError::Curl)?;
        Ok(RangeResponse { status, body })
    }
}
