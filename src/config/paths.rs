//! Path management for QuickBackup
//!
//! ## Path Resolution Order
//!
//! 1. `QUICKBACKUP_CONFIG_DIR` environment variable (if set)
//! 2. The platform config directory from `directories`
//!    (`~/.config/quickbackup` on Linux)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::QuickBackupError;

/// Environment variable overriding the config directory
pub const CONFIG_DIR_ENV: &str = "QUICKBACKUP_CONFIG_DIR";

/// Manages the paths QuickBackup reads its own state from
#[derive(Debug, Clone)]
pub struct QuickBackupPaths {
    config_dir: PathBuf,
}

impl QuickBackupPaths {
    /// Resolve the config directory
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined and the
    /// override variable is unset.
    pub fn new() -> Result<Self, QuickBackupError> {
        let config_dir = if let Ok(custom) = std::env::var(CONFIG_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            ProjectDirs::from("", "", "quickbackup")
                .map(|dirs| dirs.config_dir().to_path_buf())
                .ok_or_else(|| {
                    QuickBackupError::Config("Could not determine config directory".into())
                })?
        };

        Ok(Self { config_dir })
    }

    /// Create paths rooted at a custom directory (useful for testing)
    pub fn with_base_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("config.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = QuickBackupPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
    }
}
