//! User settings for QuickBackup
//!
//! Settings live in a small JSON file. Every field has a default, so the
//! file is optional:
//!
//! ```json
//! {
//!   "kdf": { "memory_cost": 65536, "time_cost": 3, "parallelism": 4 },
//!   "temp_dir": "/var/tmp",
//!   "default_destination_prefix": "backup",
//!   "max_archive_size": 4294967296
//! }
//! ```

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::paths::QuickBackupPaths;
use crate::crypto::{KeyDerivationParams, MAX_PLAINTEXT_SIZE};
use crate::error::QuickBackupError;

/// User settings for QuickBackup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Argon2id parameters used for new backups
    #[serde(default)]
    pub kdf: KeyDerivationParams,

    /// Where plaintext temporaries are created (system temp dir if unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_dir: Option<PathBuf>,

    /// Prefix of the dated default backup file name
    #[serde(default = "default_destination_prefix")]
    pub default_destination_prefix: String,

    /// Largest plaintext archive a backup may produce, in bytes
    ///
    /// Backup and restore hold one archive-sized buffer in memory.
    #[serde(default = "default_max_archive_size")]
    pub max_archive_size: u64,
}

fn default_destination_prefix() -> String {
    "backup".to_string()
}

fn default_max_archive_size() -> u64 {
    MAX_PLAINTEXT_SIZE
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            kdf: KeyDerivationParams::default(),
            temp_dir: None,
            default_destination_prefix: default_destination_prefix(),
            max_archive_size: default_max_archive_size(),
        }
    }
}

impl Settings {
    /// Load settings from the default location, or defaults if absent
    pub fn load_or_default(paths: &QuickBackupPaths) -> Result<Self, QuickBackupError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            Self::load_from(&settings_path)
        } else {
            debug!(path = %settings_path.display(), "no settings file, using defaults");
            Ok(Settings::default())
        }
    }

    /// Load settings from an explicit file, which must exist
    pub fn load_from(path: &Path) -> Result<Self, QuickBackupError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            QuickBackupError::Config(format!(
                "Failed to read settings file {}: {}",
                path.display(),
                e
            ))
        })?;

        let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
            QuickBackupError::Config(format!("Failed to parse settings file: {}", e))
        })?;

        settings.validate()?;
        debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Reject settings that would fail later in the pipeline
    pub fn validate(&self) -> Result<(), QuickBackupError> {
        self.kdf.validate()?;
        if self.default_destination_prefix.is_empty() {
            return Err(QuickBackupError::Config(
                "default_destination_prefix must not be empty".into(),
            ));
        }
        if self.max_archive_size == 0 || self.max_archive_size > MAX_PLAINTEXT_SIZE {
            return Err(QuickBackupError::Config(format!(
                "max_archive_size must be between 1 and {} bytes",
                MAX_PLAINTEXT_SIZE
            )));
        }
        Ok(())
    }

    /// Default backup file name for the given day: `backup-YYYY-MM-DD.zip.enc`
    pub fn default_destination(&self, today: NaiveDate) -> PathBuf {
        PathBuf::from(format!(
            "{}-{}.zip.enc",
            self.default_destination_prefix,
            today.format("%Y-%m-%d")
        ))
    }
}
