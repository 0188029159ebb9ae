//! Source descriptors, metadata reconciliation, and latency ordering.

use std::time::Duration;

use crate::error::DownloadError;

/// Metadata of the target file as advertised by one source's HEAD response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    /// Total size in bytes, from `Content-Length`.
    pub size: u64,
    /// `Content-Type` value; empty if the header was absent.
    pub content_type: String,
    /// `ETag` with surrounding double quotes stripped; empty if absent.
    pub integrity_tag: String,
}

/// One successfully probed source.
#[derive(Debug, Clone)]
pub struct SourceDescriptor {
    pub url: String,
    /// Wall-clock duration of the HEAD probe. One sample, taken once; used
    /// only for ordering.
    pub estimated_latency: Duration,
    pub metadata: FileMetadata,
}

/// Checks that all sources describe the same file and adopts one metadata
/// set. The integrity tag only has to agree when verification is enabled.
/// Callers pass at least one source.
pub fn reconcile(
    sources: &[SourceDescriptor],
    check_integrity: bool,
) -> Result<FileMetadata, DownloadError> {
    for pair in sources.windows(2) {
        let (a, b) = (&pair[0].metadata, &pair[1].metadata);
        if a.size != b.size || a.content_type != b.content_type {
            return Err(DownloadError::SourcesMismatch);
        }
        if check_integrity && a.integrity_tag != b.integrity_tag {
            return Err(DownloadError::SourcesMismatch);
        }
    }
    Ok(sources[0].metadata.clone())
}

/// Source URLs ordered by ascending estimated latency. The sort is stable,
/// so ties keep their input order. This ordering drives both primary
/// assignment and failover.
pub fn prioritized_urls(sources: &[SourceDescriptor]) -> Vec<String> {
    let mut by_latency: Vec<&SourceDescriptor> = sources.iter().collect();
    by_latency.sort_by_key(|s| s.estimated_latency);
    by_latency.into_iter().map(|s| s.url.clone()).collect()
}
