//! `backup` command
//!
//! Archives the given paths and encrypts the archive with a passphrase.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Args;

use crate::backup::{BackupManager, BackupRequest};
use crate::config::Settings;
use crate::error::QuickBackupResult;

use super::passphrase::resolve_passphrase;
use super::{format_size, relative_to_cwd};

/// Arguments for `backup`
#[derive(Args, Debug)]
pub struct BackupArgs {
    /// Files and directories to back up
    #[arg(required = true, num_args = 1..)]
    pub paths: Vec<PathBuf>,

    /// Passphrase to encrypt with ("-" to prompt)
    pub passphrase: String,

    /// Output file [default: backup-YYYY-MM-DD.zip.enc]
    #[arg(short, long)]
    pub destination: Option<PathBuf>,
}

/// Handle the backup command
///
/// `today` feeds the default file name; the caller reads the clock once.
pub fn handle_backup_command(
    settings: &Settings,
    args: BackupArgs,
    today: NaiveDate,
) -> QuickBackupResult<()> {
    let destination = args
        .destination
        .unwrap_or_else(|| settings.default_destination(today));
    let passphrase = resolve_passphrase(args.passphrase, true)?;

    let manager = BackupManager::new(settings.clone());
    let report = manager.create_backup(BackupRequest {
        inputs: args.paths,
        destination,
        passphrase,
    })?;

    println!("Backup created: {}", relative_to_cwd(&report.destination));
    println!(
        "  {} file(s), {} archived, {} encrypted",
        report.entries.len(),
        format_size(report.content_bytes),
        format_size(report.blob_bytes),
    );

    Ok(())
}
