use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use quickbackup::cli::{
    handle_backup_command, handle_info_command, handle_restore_command, BackupArgs, InfoArgs,
    RestoreArgs,
};
use quickbackup::config::{QuickBackupPaths, Settings};

#[derive(Parser)]
#[command(
    name = "quickbackup",
    version,
    about = "Bundle files into a password-encrypted archive and restore them",
    long_about = "QuickBackup zips the files and directories you name into a single \
                  archive and encrypts it with a passphrase (Argon2id + AES-256-GCM). \
                  Restoring decrypts and unpacks the archive, then DELETES the \
                  encrypted file."
)]
struct Cli {
    /// Settings file (JSON)
    #[arg(long, global = true, env = "QUICKBACKUP_CONFIG")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Archive and encrypt files and directories
    Backup(BackupArgs),

    /// Decrypt and unpack a backup, then delete the backup file
    Restore(RestoreArgs),

    /// Show the header of a backup without decrypting it
    Info(InfoArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    quickbackup::logging::init(cli.verbose)?;

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load_or_default(&QuickBackupPaths::new()?)?,
    };

    match cli.command {
        Commands::Backup(args) => {
            let today = chrono::Local::now().date_naive();
            handle_backup_command(&settings, args, today).context("Backup failed")?;
        }
        Commands::Restore(args) => {
            handle_restore_command(&settings, args).context("Restore failed")?;
        }
        Commands::Info(args) => {
            handle_info_command(args).context("Could not read backup")?;
        }
    }

    Ok(())
}
