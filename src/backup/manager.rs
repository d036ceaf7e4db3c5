//! Backup orchestration: Collect → Encrypt → Cleanup

use std::io::BufReader;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::archive::{self, ArchiveSummary};
use crate::config::Settings;
use crate::crypto::{self, Passphrase};
use crate::error::{QuickBackupError, QuickBackupResult};
use crate::storage::{write_atomic, TempArchive};

/// Everything one backup run needs
#[derive(Debug)]
pub struct BackupRequest {
    /// Files and directories to include, in order
    pub inputs: Vec<PathBuf>,
    /// Where the encrypted blob is written
    pub destination: PathBuf,
    /// Consumed and wiped by the run
    pub passphrase: Passphrase,
}

/// Outcome of a successful backup
#[derive(Debug, Clone)]
pub struct BackupReport {
    /// Path of the encrypted blob
    pub destination: PathBuf,
    /// Entry names stored in the archive
    pub entries: Vec<String>,
    /// Uncompressed size of the archived files
    pub content_bytes: u64,
    /// Size of the encrypted blob on disk
    pub blob_bytes: u64,
}

/// Creates encrypted backups
pub struct BackupManager {
    settings: Settings,
}

impl BackupManager {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Archive the inputs, encrypt the archive, write the blob
    ///
    /// The plaintext archive only exists as a temporary file and is removed
    /// before this returns, whether the run succeeded or not. The passphrase
    /// is wiped as soon as encryption is done.
    pub fn create_backup(&self, request: BackupRequest) -> QuickBackupResult<BackupReport> {
        let BackupRequest {
            inputs,
            destination,
            mut passphrase,
        } = request;

        archive::check_inputs(&inputs)?;

        let mut temp = TempArchive::create(self.settings.temp_dir.as_deref()).map_err(|e| {
            QuickBackupError::ArchiveWrite(format!("Failed to create temporary archive: {}", e))
        })?;

        let result = self.collect_and_encrypt(&inputs, &destination, &passphrase, &mut temp);
        passphrase.wipe();
        temp.discard();

        let (summary, blob_bytes) = result?;
        info!(
            destination = %destination.display(),
            entries = summary.entry_count(),
            blob_bytes,
            "backup complete"
        );

        Ok(BackupReport {
            destination,
            entries: summary.entries,
            content_bytes: summary.total_bytes,
            blob_bytes,
        })
    }

    fn collect_and_encrypt(
        &self,
        inputs: &[PathBuf],
        destination: &Path,
        passphrase: &Passphrase,
        temp: &mut TempArchive,
    ) -> QuickBackupResult<(ArchiveSummary, u64)> {
        let summary = archive::build_file(inputs, temp.as_file_mut())?;

        let archive_len = temp
            .as_file_mut()
            .metadata()
            .map_err(|e| {
                QuickBackupError::ArchiveRead(format!("Failed to stat temporary archive: {}", e))
            })?
            .len();
        if archive_len > self.settings.max_archive_size {
            return Err(QuickBackupError::ArchiveWrite(format!(
                "Archive is {} bytes, over the {} byte limit (max_archive_size)",
                archive_len, self.settings.max_archive_size
            )));
        }

        let reader = temp.reopen().map_err(|e| {
            QuickBackupError::ArchiveRead(format!("Failed to read temporary archive: {}", e))
        })?;
        let blob = crypto::encrypt_from(
            BufReader::new(reader),
            archive_len,
            passphrase,
            &self.settings.kdf,
        )?;

        let written = write_atomic(destination, &mut blob.as_slice()).map_err(|e| {
            QuickBackupError::Io(format!(
                "Failed to write backup file {}: {}",
                destination.display(),
                e
            ))
        })?;

        Ok((summary, written))
    }
}
