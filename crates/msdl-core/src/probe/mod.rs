//! Parallel source probing.
//!
//! HEADs each candidate URL, measures the elapsed wall time as the source's
//! latency estimate, and extracts the file metadata. All probes share one
//! abort flag: the first failure raises it and in-flight probes surrender at
//! their next check. A download never proceeds with a partial source set.

mod parse;

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Instant;

use crate::client::{FetchError, HttpClient};
use crate::error::DownloadError;
use crate::source::{FileMetadata, SourceDescriptor};

/// Probes every URL in parallel. Returns one descriptor per source, in input
/// order, or the first real failure.
pub fn probe_sources(
    client: &HttpClient,
    urls: &[String],
) -> Result<Vec<SourceDescriptor>, DownloadError> {
    let abort = Arc::new(AtomicBool::new(false));
    let (tx, rx) = mpsc::channel();

    let mut handles = Vec::with_capacity(urls.len());
    for (index, url) in urls.iter().enumerate() {
        let tx = tx.clone();
        let abort = Arc::clone(&abort);
        let client = client.clone();
        let url = url.clone();
        handles.push(thread::spawn(move || {
            let res = probe_one(&client, &url, &abort);
            if res.is_err() {
                abort.store(true, Ordering::Relaxed);
            }
            let _ = tx.send((index, res));
        }));
    }
    drop(tx);

    // Collect into input-order slots so latency ties downstream break by the
    // caller's ordering, not by probe completion order.
    let mut slots: Vec<Option<SourceDescriptor>> = (0..urls.len()).map(|_| None).collect();
    let mut first_error: Option<DownloadError> = None;
    for (index, res) in rx {
        match res {
            Ok(descriptor) => slots[index] = Some(descriptor),
            Err(DownloadError::Aborted) => {}
            Err(e) => {
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    for handle in handles {
        if handle.join().is_err() && first_error.is_none() {
            first_error = Some(DownloadError::Io(io::Error::new(
                io::ErrorKind::Other,
                "probe worker panicked",
            )));
        }
    }

    if let Some(e) = first_error {
        return Err(e);
    }
    Ok(slots.into_iter().flatten().collect())
}

/// Probes a single source: HEAD, latency sample, metadata extraction.
///
/// A non-200 status is a transport failure; a response without a usable
/// length or range contract rejects the source outright.
fn probe_one(
    client: &HttpClient,
    url: &str,
    abort: &AtomicBool,
) -> Result<SourceDescriptor, DownloadError> {
    if abort.load(Ordering::Relaxed) {
        return Err(DownloadError::Aborted);
    }

    let start = Instant::now();
    let resp = client.head(url, abort).map_err(|e| match e {
        FetchError::Aborted => DownloadError::Aborted,
        other => DownloadError::Transport {
            url: url.to_string(),
            source: other,
        },
    })?;
    let estimated_latency = start.elapsed();

    if resp.status != 200 {
        return Err(DownloadError::Transport {
            url: url.to_string(),
            source: FetchError::Http(resp.status),
        });
    }

    let parsed = parse::parse_headers(&resp.header_lines);
    let size = match parsed.content_length {
        Some(n) => n,
        None => {
            return Err(DownloadError::PartialRequestUnsupported {
                url: url.to_string(),
            })
        }
    };
    if !parse::range_support_usable(parsed.accept_ranges.as_deref()) {
        return Err(DownloadError::PartialRequestUnsupported {
            url: url.to_string(),
        });
    }

    tracing::debug!(
        url,
        latency_ms = estimated_latency.as_millis() as u64,
        size,
        "probed source"
    );

    Ok(SourceDescriptor {
        url: url.to_string(),
        estimated_latency,
        metadata: FileMetadata {
            size,
            content_type: parsed.content_type.unwrap_or_default(),
            integrity_tag: parsed.etag.unwrap_or_default(),
        },
    })
}
