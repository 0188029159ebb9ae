//! Per-chunk fetch protocol with cross-source failover.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::client::{FetchError, HttpClient};
use crate::error::DownloadError;
use crate::planner::ChunkPlan;

/// Fetches one chunk. The primary source is `urls[index % urls.len()]`; on
/// failure the remaining sources are tried in priority order, which may
/// include sources ahead of the primary in that list. Returns the body and
/// the index of the source that served it. Every source failing is fatal for
/// the whole download.
pub(super) fn fetch_chunk(
    client: &HttpClient,
    urls: &[String],
    chunk: &ChunkPlan,
    abort: &AtomicBool,
) -> Result<(Vec<u8>, usize), DownloadError> {
    let primary = chunk.index % urls.len();

    match attempt(client, &urls[primary], chunk, abort) {
        Ok(body) => return Ok((body, primary)),
        Err(FetchError::Aborted) => return Err(DownloadError::Aborted),
        Err(e) => {
            tracing::warn!(
                chunk = chunk.index,
                url = urls[primary].as_str(),
                error = %e,
                "initial chunk attempt failed"
            );
        }
    }

    for (i, url) in urls.iter().enumerate() {
        if abort.load(Ordering::Relaxed) {
            return Err(DownloadError::Aborted);
        }
        if i == primary {
            continue;
        }
        match attempt(client, url, chunk, abort) {
            Ok(body) => return Ok((body, i)),
            Err(FetchError::Aborted) => return Err(DownloadError::Aborted),
            Err(e) => {
                tracing::warn!(
                    chunk = chunk.index,
                    url = url.as_str(),
                    error = %e,
                    "chunk failover attempt failed"
                );
            }
        }
    }

    Err(DownloadError::ChunkExhausted { index: chunk.index })
}

/// One ranged GET. Anything other than a 206 carrying exactly the requested
/// byte count is a failed attempt.
fn attempt(
    client: &HttpClient,
    url: &str,
    chunk: &ChunkPlan,
    abort: &AtomicBool,
) -> Result<Vec<u8>, FetchError> {
    let resp = client.get_range(url, chunk.offset, chunk.end_inclusive, abort)?;
    if resp.status != 206 {
        return Err(FetchError::Http(resp.status));
    }
    let received = resp.body.len() as u64;
    if received != chunk.len() {
        return Err(FetchError::Body {
            expected: chunk.len(),
            received,
        });
    }
    Ok(resp.body)
}
