//! Builder for creating and preallocating the staging file.

use std::fs::File;
use std::io;
#[cfg(unix)]
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};

use super::writer::StagingFile;

/// Builder for a fresh staging file. Call `preallocate` then `build` to get
/// a `StagingFile` that supports concurrent `write_at` from the chunk
/// workers.
pub struct StagingFileBuilder {
    file: File,
    path: PathBuf,
}

impl StagingFileBuilder {
    /// Creates the staging file, truncating any leftover from an earlier run.
    pub fn create(path: &Path) -> io::Result<Self> {
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        Ok(StagingFileBuilder {
            file,
            path: path.to_path_buf(),
        })
    }

    /// Preallocates `size` bytes. On Unix tries `posix_fallocate` for real
    /// block allocation, falling back to `set_len`. The size is known before
    /// any chunk is fetched, so workers never extend the file.
    pub fn preallocate(&mut self, size: u64) -> io::Result<()> {
        if size == 0 {
            return Ok(());
        }
        #[cfg(unix)]
        {
            let fd = self.file.as_raw_fd();
            let r = unsafe { libc::posix_fallocate(fd, 0, size as libc::off_t) };
            if r == 0 {
                return Ok(());
            }
            tracing::debug!(errno = r, "posix_fallocate failed, falling back to set_len");
        }
        self.file.set_len(size)
    }

    /// Finishes building and returns the shared writer.
    pub fn build(self) -> StagingFile {
        StagingFile::from_file_and_path(self.file, self.path)
    }
}
