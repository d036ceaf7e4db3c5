//! Archive extraction
//!
//! Materializes every entry of a ZIP container under a destination directory.
//! Each entry is written atomically on its own; there is no transaction
//! across entries, so a failure part way through leaves the entries already
//! written in place.
//!
//! Entry names are not confined to the destination: a leading root is
//! dropped, but `..` components are honoured as-is.

use std::fs::{self, File};
use std::io::{BufReader, Read, Seek};
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info, warn};
use zip::ZipArchive;

use crate::error::{QuickBackupError, QuickBackupResult};
use crate::storage::write_atomic;

/// What an extraction produced
#[derive(Debug, Clone, Default)]
pub struct ExtractSummary {
    /// Files written, in archive order
    pub files: Vec<PathBuf>,
    /// Sum of bytes written
    pub total_bytes: u64,
}

/// Map an entry name to its location under `destination`
///
/// Root and drive prefixes are stripped so absolute names land inside the
/// destination; `.` is dropped and `..` is kept.
pub fn resolve_entry_path(destination: &Path, name: &str) -> PathBuf {
    let mut target = destination.to_path_buf();
    for component in Path::new(name).components() {
        match component {
            Component::Prefix(_) | Component::RootDir | Component::CurDir => {}
            Component::ParentDir => target.push(".."),
            Component::Normal(part) => target.push(part),
        }
    }
    target
}

fn escapes_destination(name: &str) -> bool {
    Path::new(name)
        .components()
        .any(|c| matches!(c, Component::ParentDir))
}

/// Extract every entry of the archive read from `reader` into `destination`
pub fn extract<R: Read + Seek>(reader: R, destination: &Path) -> QuickBackupResult<ExtractSummary> {
    let mut archive = ZipArchive::new(reader)
        .map_err(|e| QuickBackupError::ArchiveRead(format!("Invalid archive: {}", e)))?;

    let mut summary = ExtractSummary::default();

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(|e| {
            QuickBackupError::ArchiveRead(format!("Failed to read entry {}: {}", index, e))
        })?;

        let name = entry.name().to_string();
        if escapes_destination(&name) {
            warn!(entry = %name, "entry name contains '..'; writing outside the destination");
        }
        let target = resolve_entry_path(destination, &name);

        if entry.is_dir() {
            fs::create_dir_all(&target).map_err(|e| {
                QuickBackupError::Extraction(format!("{}: {}", target.display(), e))
            })?;
            continue;
        }

        let written = write_atomic(&target, &mut entry)
            .map_err(|e| QuickBackupError::Extraction(format!("{}: {}", target.display(), e)))?;

        debug!(entry = %name, path = %target.display(), bytes = written, "extracted file");
        summary.total_bytes += written;
        summary.files.push(target);
    }

    info!(
        files = summary.files.len(),
        bytes = summary.total_bytes,
        destination = %destination.display(),
        "archive extracted"
    );
    Ok(summary)
}

/// Extract an archive file into `destination`
pub fn extract_file(archive: &Path, destination: &Path) -> QuickBackupResult<ExtractSummary> {
    let file = File::open(archive).map_err(|e| {
        QuickBackupError::ArchiveRead(format!("Failed to open {}: {}", archive.display(), e))
    })?;
    extract(BufReader::new(file), destination)
}
