//! Staging-file I/O and atomic publish.
//!
//! The staging file lives next to the destination so the final rename stays
//! on one filesystem and is atomic. It is preallocated to the full size up
//! front and takes concurrent offset writes (pwrite) from the chunk workers.
//! On failure the staging file is left on disk.

mod builder;
mod writer;

pub use builder::StagingFileBuilder;
pub use writer::{SealedStaging, StagingFile};

/// Suffix appended to the destination path while the download is in flight.
pub const STAGING_SUFFIX: &str = ".download";

/// Staging path for a destination: `file.bin` → `file.bin.download`.
pub fn staging_path(destination: &std::path::Path) -> std::path::PathBuf {
    let mut o = destination.as_os_str().to_owned();
    o.push(STAGING_SUFFIX);
    std::path::PathBuf::from(o)
}
