//! `info` command
//!
//! Shows the header of an encrypted backup without decrypting it.

use std::fs;
use std::path::PathBuf;

use clap::Args;

use crate::crypto;
use crate::error::{QuickBackupError, QuickBackupResult};

use super::format_size;

/// Arguments for `info`
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Encrypted backup file
    pub file: PathBuf,
}

/// Handle the info command
pub fn handle_info_command(args: InfoArgs) -> QuickBackupResult<()> {
    let blob = fs::read(&args.file).map_err(|e| {
        QuickBackupError::Io(format!(
            "Failed to read backup file {}: {}",
            args.file.display(),
            e
        ))
    })?;
    let header = crypto::inspect(&blob)?;

    println!("Backup Details");
    println!("==============");
    println!("File: {}", args.file.display());
    println!("Size: {}", format_size(blob.len() as u64));
    println!("Payload: {}", format_size(header.payload_len as u64));
    println!("Format version: {}", header.version);
    println!("Algorithm: {}", header.algorithm_name());
    println!();
    println!("Key Derivation Parameters:");
    println!("  Memory Cost: {} KiB", header.kdf.memory_cost);
    println!("  Time Cost: {} iterations", header.kdf.time_cost);
    println!("  Parallelism: {} threads", header.kdf.parallelism);

    Ok(())
}
