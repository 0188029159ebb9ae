//! Chunk scheduling: concurrent ranged GETs with cross-source failover.
//!
//! Each chunk's first attempt goes to a primary source chosen round-robin
//! over the priority-ordered URL list; on failure the chunk falls back to the
//! remaining sources in priority order. At most `connections` fetches are in
//! flight at once, and the first fatal failure aborts the remaining work.

mod chunk;
mod run;

use crate::client::HttpClient;
use crate::error::DownloadError;
use crate::planner::ChunkPlan;
use crate::storage::StagingFile;

/// Fetches every planned chunk and writes each at its offset in the staging
/// file. Completion order is arbitrary; the positional writes make that safe.
/// Returns the first fatal error, never a sibling's abort outcome.
pub fn download_chunks(
    client: &HttpClient,
    urls: &[String],
    chunks: &[ChunkPlan],
    staging: &StagingFile,
    connections: usize,
    quiet: bool,
) -> Result<(), DownloadError> {
    if chunks.is_empty() {
        return Ok(());
    }
    run::run_pool(client, urls, chunks, staging, connections, quiet)
}
