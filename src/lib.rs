//! QuickBackup - encrypted archive backups from the command line
//!
//! Bundles files and directories into a ZIP archive, encrypts it with a
//! passphrase, and restores such archives.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `archive`: ZIP construction from an input selection, and extraction
//! - `crypto`: Argon2id key derivation, AES-256-GCM blobs, secret buffers
//! - `backup`: the backup and restore pipelines
//! - `storage`: atomic writes and the temporary plaintext archive
//! - `config`: configuration and path management
//! - `cli`: command handlers used by the `quickbackup` binary
//! - `error`: custom error types
//! - `logging`: tracing subscriber setup
//!
//! # Example
//!
//! ```rust,ignore
//! use quickbackup::backup::{BackupManager, BackupRequest};
//! use quickbackup::config::{QuickBackupPaths, Settings};
//!
//! let settings = Settings::load_or_default(&QuickBackupPaths::new()?)?;
//! BackupManager::new(settings).create_backup(BackupRequest {
//!     inputs: vec!["docs".into()],
//!     destination: "docs.zip.enc".into(),
//!     passphrase: "secret123".into(),
//! })?;
//! ```

pub mod archive;
pub mod backup;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod error;
pub mod logging;
pub mod storage;

pub use error::{QuickBackupError, QuickBackupResult};
