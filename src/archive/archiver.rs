//! Archive construction
//!
//! Walks the input selection and writes every regular file into a ZIP
//! container. Entry names are the walked paths exactly as produced, so an
//! input of `docs/` yields names like `docs/sub/b.txt` and an absolute input
//! yields absolute names.
//!
//! ZIP names are UTF-8. A path that is not valid UTF-8 cannot be recreated
//! from its entry, so it is rejected before anything is written.

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufWriter, Seek, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{QuickBackupError, QuickBackupResult};

/// Entries above this size need ZIP64 headers
const ZIP64_THRESHOLD: u64 = u32::MAX as u64;

/// What went into an archive
#[derive(Debug, Clone, Default)]
pub struct ArchiveSummary {
    /// Entry names in archive order
    pub entries: Vec<String>,
    /// Sum of uncompressed entry sizes
    pub total_bytes: u64,
}

impl ArchiveSummary {
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

/// Fail with `PathNotFound` on the first input that does not exist
///
/// Root symlinks are followed, so a dangling link counts as missing.
pub fn check_inputs(paths: &[PathBuf]) -> QuickBackupResult<()> {
    match paths.iter().find(|p| p.metadata().is_err()) {
        Some(missing) => Err(QuickBackupError::path_not_found(missing)),
        None => Ok(()),
    }
}

/// Expand the input selection into the regular files it covers
///
/// Directories are walked depth-first, pre-order, siblings sorted by name.
/// Duplicates across inputs are kept.
pub fn collect_files(paths: &[PathBuf]) -> QuickBackupResult<Vec<PathBuf>> {
    check_inputs(paths)?;

    let mut files = Vec::new();
    for root in paths {
        walk(root, |path| {
            files.push(path.to_path_buf());
            Ok(())
        })?;
    }
    Ok(files)
}

fn walk<F>(root: &Path, mut visit: F) -> QuickBackupResult<()>
where
    F: FnMut(&Path) -> QuickBackupResult<()>,
{
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            QuickBackupError::ArchiveWrite(format!("Failed to walk {}: {}", root.display(), e))
        })?;

        // Only regular files; symlinks and special files are skipped
        if !entry.file_type().is_file() {
            continue;
        }
        visit(entry.path())?;
    }
    Ok(())
}

/// Write the archive for `paths` into `writer`
///
/// All inputs are checked and every entry name is settled before the first
/// byte is written. A file reached through several inputs is stored once.
/// The container is finished and flushed before returning.
pub fn build<W: Write + Seek>(paths: &[PathBuf], writer: W) -> QuickBackupResult<ArchiveSummary> {
    let entries = entry_names(collect_files(paths)?)?;

    let mut zip = ZipWriter::new(writer);
    let mut summary = ArchiveSummary::default();

    for (path, name) in entries {
        let size = append_file(&mut zip, &path, &name)?;
        summary.entries.push(name);
        summary.total_bytes += size;
    }

    let mut inner = zip
        .finish()
        .map_err(|e| QuickBackupError::ArchiveWrite(format!("Failed to finish archive: {}", e)))?;
    inner
        .flush()
        .map_err(|e| QuickBackupError::ArchiveWrite(format!("Failed to flush archive: {}", e)))?;

    info!(
        entries = summary.entry_count(),
        bytes = summary.total_bytes,
        "archive built"
    );
    Ok(summary)
}

/// Pair each distinct file with its entry name
fn entry_names(files: Vec<PathBuf>) -> QuickBackupResult<Vec<(PathBuf, String)>> {
    let mut seen = HashSet::new();
    let mut entries = Vec::with_capacity(files.len());

    for path in files {
        // Overlapping inputs walk the same file twice; ZIP names must be unique
        if !seen.insert(path.clone()) {
            debug!(path = %path.display(), "skipping file already archived");
            continue;
        }

        let name = path.to_str().map(str::to_owned).ok_or_else(|| {
            QuickBackupError::ArchiveWrite(format!(
                "{}: file name is not valid UTF-8 and cannot be stored",
                path.display()
            ))
        })?;
        entries.push((path, name));
    }
    Ok(entries)
}

/// Build the archive straight into a file at `out`
pub fn build_file(paths: &[PathBuf], out: &mut File) -> QuickBackupResult<ArchiveSummary> {
    let summary = build(paths, BufWriter::new(&mut *out))?;
    out.sync_all()
        .map_err(|e| QuickBackupError::ArchiveWrite(format!("Failed to sync archive: {}", e)))?;
    Ok(summary)
}

fn append_file<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    path: &Path,
    name: &str,
) -> QuickBackupResult<u64> {
    let mut file = File::open(path).map_err(|e| write_err(name, e))?;
    let len = file.metadata().map_err(|e| write_err(name, e))?.len();

    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .large_file(len >= ZIP64_THRESHOLD);

    zip.start_file(name, options)
        .map_err(|e| write_err(name, e))?;
    let copied = io::copy(&mut file, zip).map_err(|e| write_err(name, e))?;

    debug!(entry = %name, bytes = copied, "archived file");
    Ok(copied)
}

fn write_err(name: &str, err: impl std::fmt::Display) -> QuickBackupError {
    QuickBackupError::ArchiveWrite(format!("{}: {}", name, err))
}
