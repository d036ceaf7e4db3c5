//! `restore` command
//!
//! Decrypts a backup and unpacks it. The encrypted file is deleted once the
//! restore succeeds.

use std::path::{Path, PathBuf};

use clap::Args;

use crate::backup::{RestoreManager, RestoreRequest};
use crate::config::Settings;
use crate::error::QuickBackupResult;

use super::passphrase::resolve_passphrase;
use super::{format_size, relative_to_cwd};

/// Arguments for `restore`
#[derive(Args, Debug)]
pub struct RestoreArgs {
    /// Encrypted backup file (deleted after a successful restore)
    pub file: PathBuf,

    /// Passphrase the backup was encrypted with ("-" to prompt)
    pub passphrase: String,

    /// Directory to restore into [default: the backup file's directory]
    pub destination_dir: Option<PathBuf>,
}

/// Directory a backup restores into when none is given
pub fn default_destination_dir(file: &Path) -> PathBuf {
    match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Handle the restore command
pub fn handle_restore_command(settings: &Settings, args: RestoreArgs) -> QuickBackupResult<()> {
    let destination_dir = args
        .destination_dir
        .unwrap_or_else(|| default_destination_dir(&args.file));
    let passphrase = resolve_passphrase(args.passphrase, false)?;

    let manager = RestoreManager::new(settings.clone());
    let report = manager.restore(RestoreRequest {
        source: args.file,
        destination_dir: destination_dir.clone(),
        passphrase,
    })?;

    println!("Restore complete: {}", relative_to_cwd(&destination_dir));
    println!(
        "  {} file(s), {}",
        report.files.len(),
        format_size(report.total_bytes)
    );
    println!("Removed backup file: {}", relative_to_cwd(&report.removed_source));

    Ok(())
}
