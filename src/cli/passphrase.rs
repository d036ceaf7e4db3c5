//! Passphrase acquisition
//!
//! The passphrase is a positional argument. The value `-` asks for it on the
//! terminal instead, with hidden input, so it stays out of shell history.

use crate::crypto::Passphrase;
use crate::error::{QuickBackupError, QuickBackupResult};

/// Argument value that triggers an interactive prompt
pub const PROMPT_MARKER: &str = "-";

/// Turn the command-line value into a passphrase, prompting if asked to
///
/// With `confirm`, the prompt is repeated until both entries match.
pub fn resolve_passphrase(arg: String, confirm: bool) -> QuickBackupResult<Passphrase> {
    if arg != PROMPT_MARKER {
        return Ok(Passphrase::new(arg));
    }

    if !confirm {
        return prompt_passphrase("Passphrase: ");
    }

    loop {
        let first = prompt_passphrase("New passphrase: ")?;
        if first.is_empty() {
            println!("Passphrase must not be empty. Please try again.");
            continue;
        }

        let second = prompt_passphrase("Confirm passphrase: ")?;
        if first.as_bytes() != second.as_bytes() {
            println!("Passphrases do not match. Please try again.");
            continue;
        }

        return Ok(first);
    }
}

/// Prompt for a passphrase (hidden input)
fn prompt_passphrase(prompt: &str) -> QuickBackupResult<Passphrase> {
    rpassword::prompt_password(prompt)
        .map(Passphrase::new)
        .map_err(|e| QuickBackupError::Io(format!("Failed to read passphrase: {}", e)))
}
