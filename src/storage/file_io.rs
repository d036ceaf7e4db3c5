//! File I/O utilities with atomic writes
//!
//! Provides safe file operations that won't leave a half-written file at the
//! target path on failure.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// Sibling path used while a file is being written
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("file"));
    name.push(".qbtmp");
    path.with_file_name(name)
}

/// Stream `reader` into `path` atomically (write to temp, then rename)
///
/// Missing parent directories are created. An existing file at `path` is
/// replaced. On failure the staging file is removed and `path` is left as it
/// was. Returns the number of bytes written.
pub fn write_atomic<R, P>(path: P, reader: &mut R) -> io::Result<u64>
where
    R: Read + ?Sized,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    // Same directory as the target so the rename stays on one filesystem
    let temp_path = staging_path(path);

    let result = stage(&temp_path, reader).and_then(|written| {
        fs::rename(&temp_path, path)?;
        Ok(written)
    });

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn stage<R: Read + ?Sized>(temp_path: &Path, reader: &mut R) -> io::Result<u64> {
    let file = File::create(temp_path)?;
    let mut writer = BufWriter::new(file);
    let written = io::copy(reader, &mut writer)?;
    writer.flush()?;

    // Sync to disk before rename
    writer.get_ref().sync_all()?;
    Ok(written)
}
