//! Backup and restore pipelines
//!
//! # Architecture
//!
//! - `BackupManager`: archive the inputs into a temporary ZIP, encrypt it,
//!   write the blob, remove the temporary archive
//! - `RestoreManager`: decrypt the blob into a temporary ZIP, extract it,
//!   remove the temporary archive and **the source blob**
//!
//! # Example
//!
//! ```rust,ignore
//! use quickbackup::backup::{BackupManager, BackupRequest, RestoreManager, RestoreRequest};
//! use quickbackup::config::Settings;
//!
//! let settings = Settings::default();
//! let report = BackupManager::new(settings.clone()).create_backup(BackupRequest {
//!     inputs: vec!["docs".into()],
//!     destination: "backup-2021-06-09.zip.enc".into(),
//!     passphrase: "secret123".into(),
//! })?;
//!
//! // Later; this deletes backup-2021-06-09.zip.enc
//! RestoreManager::new(settings).restore(RestoreRequest {
//!     source: report.destination,
//!     destination_dir: "restored".into(),
//!     passphrase: "secret123".into(),
//! })?;
//! ```

mod manager;
mod restore;

pub use manager::{BackupManager, BackupReport, BackupRequest};
pub use restore::{RestoreManager, RestoreReport, RestoreRequest};
