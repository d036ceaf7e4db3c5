//! Temporary plaintext archive
//!
//! The unencrypted archive only ever exists as a [`TempArchive`]. The file is
//! removed when the guard is discarded or dropped, on success and failure
//! paths alike.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use tempfile::{Builder, NamedTempFile};
use tracing::{debug, warn};

/// Guard around the on-disk plaintext archive
pub struct TempArchive {
    file: NamedTempFile,
}

impl TempArchive {
    /// Create an empty temporary archive in `dir`, or the system temp dir
    pub fn create(dir: Option<&Path>) -> io::Result<Self> {
        let mut builder = Builder::new();
        builder.prefix("quickbackup-").suffix(".zip");

        let file = match dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        debug!(path = %file.path().display(), "created temporary archive");

        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Writable handle positioned at the start of the file
    pub fn as_file_mut(&mut self) -> &mut File {
        self.file.as_file_mut()
    }

    /// Fresh read handle, independent of the write handle's cursor
    pub fn reopen(&self) -> io::Result<File> {
        self.file.reopen()
    }

    /// Replace the contents with `bytes` and sync them to disk
    pub fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        let file = self.file.as_file_mut();
        file.write_all(bytes)?;
        file.flush()?;
        file.sync_all()
    }

    /// Remove the file now, logging any failure
    pub fn discard(self) {
        let path = self.file.path().to_path_buf();
        match self.file.close() {
            Ok(()) => debug!(path = %path.display(), "removed temporary archive"),
            Err(e) => warn!(
                path = %path.display(),
                error = %e,
                "failed to remove temporary plaintext archive"
            ),
        }
    }
}
