//! Concurrent offset writer for the staging file.

use std::fs::File;
use std::io;
#[cfg(unix)]
use std::os::unix::fs::FileExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Open staging file. Cheap to clone; every clone writes through the same
/// file handle, and each `write_at` targets its own offset, so chunk workers
/// can write concurrently.
#[derive(Clone)]
pub struct StagingFile {
    file: Arc<File>,
    path: PathBuf,
}

impl StagingFile {
    pub(crate) fn from_file_and_path(file: File, path: PathBuf) -> Self {
        Self {
            file: Arc::new(file),
            path,
        }
    }

    /// Write `data` at `offset` without touching a shared cursor.
    #[cfg(unix)]
    pub fn write_at(&self, offset: u64, data: &[u8]) -> io::Result<()> {
        self.file.write_all_at(data, offset)
    }

    /// Fallback for non-Unix targets: seek + write on a cloned handle. Not
    /// safe for concurrent use.
    #[cfg(not(unix))]
    pub fn write_at(&self, offset: u64, data: &[u8]) -> io::Result<()> {
        use std::io::{Seek, SeekFrom, Write};
        let mut f = self.file.try_clone()?;
        f.seek(SeekFrom::Start(offset))?;
        f.write_all(data)
    }

    /// Path to the staging file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Syncs to disk and closes the file for writing. All chunk workers must
    /// have been joined first, so this drop releases the last handle.
    pub fn seal(self) -> io::Result<SealedStaging> {
        self.file.sync_all()?;
        drop(self.file);
        Ok(SealedStaging { path: self.path })
    }
}

/// A fully written, closed staging file awaiting verification and publish.
pub struct SealedStaging {
    path: PathBuf,
}

impl SealedStaging {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Atomically renames the staging file onto the destination. Fails if
    /// the destination is on a different filesystem.
    pub fn publish(self, destination: &Path) -> io::Result<()> {
        std::fs::rename(&self.path, destination)
    }
}
