//! Restore orchestration: Decrypt → Extract → Cleanup
//!
//! A successful restore DELETES the encrypted source file. Restore consumes
//! its input; keep a copy of the blob if you need it afterwards. The source
//! is left untouched when any step fails.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::archive::{self, ExtractSummary};
use crate::config::Settings;
use crate::crypto::{self, Passphrase, SecureBytes};
use crate::error::{QuickBackupError, QuickBackupResult};
use crate::storage::TempArchive;

/// Everything one restore run needs
#[derive(Debug)]
pub struct RestoreRequest {
    /// Encrypted blob to restore; deleted on success
    pub source: PathBuf,
    /// Directory the archive entries are recreated under
    pub destination_dir: PathBuf,
    /// Consumed and wiped by the run
    pub passphrase: Passphrase,
}

/// Outcome of a successful restore
#[derive(Debug, Clone)]
pub struct RestoreReport {
    /// Files written, in archive order
    pub files: Vec<PathBuf>,
    /// Bytes written across all files
    pub total_bytes: u64,
    /// The blob that was consumed
    pub removed_source: PathBuf,
}

impl RestoreReport {
    /// Get a summary of what was restored
    pub fn summary(&self) -> String {
        format!(
            "Restored {} file(s), {} bytes",
            self.files.len(),
            self.total_bytes
        )
    }
}

/// Handles restoring from encrypted backups
pub struct RestoreManager {
    settings: Settings,
}

impl RestoreManager {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Decrypt the source blob, extract it, then delete the temporary
    /// archive and the source blob
    ///
    /// A wrong passphrase or corrupted blob fails before anything is written
    /// to the destination.
    pub fn restore(&self, request: RestoreRequest) -> QuickBackupResult<RestoreReport> {
        let RestoreRequest {
            source,
            destination_dir,
            mut passphrase,
        } = request;

        let blob = read_blob(&source)?;

        let decrypted = crypto::decrypt_in_place(blob, &passphrase);
        passphrase.wipe();
        let plaintext = decrypted?;

        let mut temp = TempArchive::create(self.settings.temp_dir.as_deref()).map_err(|e| {
            QuickBackupError::Extraction(format!("Failed to create temporary archive: {}", e))
        })?;

        let result = stage_and_extract(plaintext, &mut temp, &destination_dir);
        temp.discard();
        let summary = result?;

        fs::remove_file(&source).map_err(|e| {
            warn!(path = %source.display(), error = %e, "restored, but could not delete backup file");
            QuickBackupError::Io(format!(
                "Failed to delete backup file {}: {}",
                source.display(),
                e
            ))
        })?;

        info!(
            source = %source.display(),
            destination = %destination_dir.display(),
            files = summary.files.len(),
            "restore complete"
        );

        Ok(RestoreReport {
            files: summary.files,
            total_bytes: summary.total_bytes,
            removed_source: source,
        })
    }
}

/// Read the whole blob, refusing files no backup could have produced
fn read_blob(source: &Path) -> QuickBackupResult<Vec<u8>> {
    let io_err = |e: std::io::Error| {
        QuickBackupError::Io(format!(
            "Failed to read backup file {}: {}",
            source.display(),
            e
        ))
    };

    let len = fs::metadata(source).map_err(io_err)?.len();
    if len > crypto::MAX_BLOB_SIZE {
        return Err(QuickBackupError::ArchiveRead(format!(
            "{} is {} bytes, larger than any backup ({} bytes)",
            source.display(),
            len,
            crypto::MAX_BLOB_SIZE
        )));
    }

    fs::read(source).map_err(io_err)
}

fn stage_and_extract(
    plaintext: SecureBytes,
    temp: &mut TempArchive,
    destination_dir: &Path,
) -> QuickBackupResult<ExtractSummary> {
    temp.write_all(&plaintext).map_err(|e| {
        QuickBackupError::Extraction(format!("Failed to write temporary archive: {}", e))
    })?;
    drop(plaintext);

    archive::extract_file(temp.path(), destination_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backup::{BackupManager, BackupRequest};
    use crate::crypto::KeyDerivationParams;
    use tempfile::TempDir;

    fn fast_settings(temp_dir: &Path) -> Settings {
        Settings {
            kdf: KeyDerivationParams::with_values(1024, 1, 1),
            temp_dir: Some(temp_dir.to_path_buf()),
            ..Settings::default()
        }
    }

    /// Backs up `inputs` with passphrase "secret123" and returns the blob path
    fn make_backup(work: &Path, scratch: &Path, inputs: Vec<PathBuf>) -> PathBuf {
        let destination = work.join("backup.zip.enc");
        BackupManager::new(fast_settings(scratch))
            .create_backup(BackupRequest {
                inputs,
                destination: destination.clone(),
                passphrase: "secret123".into(),
            })
            .unwrap();
        destination
    }

    fn fixture(root: &Path) -> PathBuf {
        let docs = root.join("docs");
        fs::create_dir_all(docs.join("sub")).unwrap();
        fs::write(docs.join("a.txt"), "hello").unwrap();
        fs::write(docs.join("sub").join("b.txt"), "world").unwrap();
        docs
    }

    #[test]
    fn test_round_trip_recreates_walked_paths() {
        let work = TempDir::new().unwrap();
        let scratch = TempDir::new().unwrap();
        let restored = TempDir::new().unwrap();
        let docs = fixture(work.path());
        let blob = make_backup(work.path(), scratch.path(), vec![docs.clone()]);

        let report = RestoreManager::new(fast_settings(scratch.path()))
            .restore(RestoreRequest {
                source: blob.clone(),
                destination_dir: restored.path().to_path_buf(),
                passphrase: "secret123".into(),
            })
            .unwrap();

        assert_eq!(report.files.len(), 2);
        assert_eq!(report.total_bytes, 10);

        // Entry names are the absolute input paths, recreated under the destination
        let a = archive::resolve_entry_path(restored.path(), &docs.join("a.txt").to_string_lossy());
        let b = archive::resolve_entry_path(
            restored.path(),
            &docs.join("sub").join("b.txt").to_string_lossy(),
        );
        assert_eq!(fs::read_to_string(a).unwrap(), "hello");
        assert_eq!(fs::read_to_string(b).unwrap(), "world");
    }

    #[test]
    fn test_restore_consumes_source_and_temp() {
        let work = TempDir::new().unwrap();
        let scratch = TempDir::new().unwrap();
        let restored = TempDir::new().unwrap();
        let docs = fixture(work.path());
        let blob = make_backup(work.path(), scratch.path(), vec![docs]);

        let report = RestoreManager::new(fast_settings(scratch.path()))
            .restore(RestoreRequest {
                source: blob.clone(),
                destination_dir: restored.path().to_path_buf(),
                passphrase: "secret123".into(),
            })
            .unwrap();

        assert_eq!(report.removed_source, blob);
        assert!(!blob.exists());
        assert_eq!(fs::read_dir(scratch.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_wrong_passphrase_leaves_everything_in_place() {
        let work = TempDir::new().unwrap();
        let scratch = TempDir::new().unwrap();
        let restored = TempDir::new().unwrap();
        let docs = fixture(work.path());
        let blob = make_backup(work.path(), scratch.path(), vec![docs]);

        let result = RestoreManager::new(fast_settings(scratch.path())).restore(RestoreRequest {
            source: blob.clone(),
            destination_dir: restored.path().to_path_buf(),
            passphrase: "wrong".into(),
        });

        assert!(matches!(result, Err(QuickBackupError::Decryption)));
        assert!(blob.exists());
        assert_eq!(fs::read_dir(restored.path()).unwrap().count(), 0);
        assert_eq!(fs::read_dir(scratch.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_extraction_failure_keeps_source() {
        let work = TempDir::new().unwrap();
        let scratch = TempDir::new().unwrap();
        let restored = TempDir::new().unwrap();
        let docs = fixture(work.path());
        let blob = make_backup(work.path(), scratch.path(), vec![docs.clone()]);

        // A regular file where the entries' parent directory has to go
        let blocked = archive::resolve_entry_path(restored.path(), &docs.to_string_lossy());
        fs::create_dir_all(blocked.parent().unwrap()).unwrap();
        fs::write(&blocked, "blocker").unwrap();

        let result = RestoreManager::new(fast_settings(scratch.path())).restore(RestoreRequest {
            source: blob.clone(),
            destination_dir: restored.path().to_path_buf(),
            passphrase: "secret123".into(),
        });

        assert!(matches!(result, Err(QuickBackupError::Extraction(_))));
        assert!(blob.exists());
        assert_eq!(fs::read(&blocked).unwrap(), b"blocker");
        assert_eq!(fs::read_dir(scratch.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_tampered_blob_is_rejected() {
        let work = TempDir::new().unwrap();
        let scratch = TempDir::new().unwrap();
        let restored = TempDir::new().unwrap();
        let docs = fixture(work.path());
        let blob = make_backup(work.path(), scratch.path(), vec![docs]);

        let mut bytes = fs::read(&blob).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x80;
        fs::write(&blob, &bytes).unwrap();

        let result = RestoreManager::new(fast_settings(scratch.path())).restore(RestoreRequest {
            source: blob.clone(),
            destination_dir: restored.path().to_path_buf(),
            passphrase: "secret123".into(),
        });

        assert!(matches!(result, Err(QuickBackupError::Decryption)));
        assert!(blob.exists());
        assert_eq!(fs::read_dir(restored.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_source_is_io_error() {
        let scratch = TempDir::new().unwrap();
        let restored = TempDir::new().unwrap();

        let result = RestoreManager::new(fast_settings(scratch.path())).restore(RestoreRequest {
            source: scratch.path().join("nope.zip.enc"),
            destination_dir: restored.path().to_path_buf(),
            passphrase: "secret123".into(),
        });

        assert!(matches!(result, Err(QuickBackupError::Io(_))));
    }
}
