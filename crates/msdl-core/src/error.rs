//! Download failure kinds surfaced to callers.

use std::fmt;
use std::io;

use crate::client::FetchError;

/// Error returned by the download service. Each variant is a distinct kind
/// the caller can match on; the CLI prints the message and exits non-zero.
#[derive(Debug)]
pub enum DownloadError {
    /// No source URLs were given.
    NoSources,
    /// A source's HEAD response lacks a usable range/length contract
    /// (no `Content-Length`, or ranged requests not supported).
    PartialRequestUnsupported {
        url: String,
    },
    /// Probed sources disagree on the file they serve.
    SourcesMismatch,
    /// Every source failed for one chunk.
    ChunkExhausted {
        index: usize,
    },
    /// MD5 of the staged file did not match the advertised tag.
    IntegrityMismatch {
        expected: String,
        actual: String,
    },
    /// Filesystem operation failed (create/write/sync/rename).
    Io(io::Error),
    /// HTTP failure with no retry path (e.g. during the probe phase).
    Transport {
        url: String,
        source: FetchError,
    },
    /// The shared abort flag was raised before this task finished. Sibling
    /// tasks report this when another task hit a fatal error; it never
    /// reaches callers unless nothing else went wrong first.
    Aborted,
}

impl fmt::Display for DownloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadError::NoSources => write!(f, "source URLs required"),
            DownloadError::PartialRequestUnsupported { url } => {
                write!(f, "partial requests not supported by {}", url)
            }
            DownloadError::SourcesMismatch => {
                write!(f, "file metadata from the source URLs do not match")
            }
            DownloadError::ChunkExhausted { index } => {
                write!(f, "failed to download chunk {} from all sources", index)
            }
            DownloadError::IntegrityMismatch { expected, actual } => {
                write!(f, "integrity tag mismatch: expected {}, got {}", expected, actual)
            }
            DownloadError::Io(e) => write!(f, "file operation failed: {}", e),
            DownloadError::Transport { url, source } => {
                write!(f, "request to {} failed: {}", url, source)
            }
            DownloadError::Aborted => write!(f, "download aborted"),
        }
    }
}

impl std::error::Error for DownloadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DownloadError::Io(e) => Some(e),
            DownloadError::Transport { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<io::Error> for DownloadError {
    fn from(e: io::Error) -> Self {
        DownloadError::Io(e)
    }
}
