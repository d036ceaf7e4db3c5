//! Key derivation using Argon2id
//!
//! Derives encryption keys from user passphrases using Argon2id,
//! a memory-hard key derivation function resistant to GPU/ASIC attacks.

use argon2::{Algorithm, Argon2, Params, Version};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{QuickBackupError, QuickBackupResult};

use super::Passphrase;

/// Size of the random salt stored in every blob
pub const SALT_SIZE: usize = 16;

/// Size of the derived key (AES-256)
pub const KEY_SIZE: usize = 32;

/// Upper bound on memory cost, in KiB (1 GiB)
///
/// Checked for settings and for blob headers alike, before any key is
/// derived.
pub const MAX_MEMORY_COST: u32 = 1024 * 1024;

/// Upper bound on time cost (passes over memory)
pub const MAX_TIME_COST: u32 = 16;

/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyDerivationParams {
    /// Memory cost in KiB (default: 65536 = 64 MiB)
    pub memory_cost: u32,
    /// Time cost (iterations, default: 3)
    pub time_cost: u32,
    /// Parallelism degree (default: 4)
    pub parallelism: u32,
}

impl Default for KeyDerivationParams {
    fn default() -> Self {
        Self {
            memory_cost: 65536,
            time_cost: 3,
            parallelism: 4,
        }
    }
}

impl KeyDerivationParams {
    /// Create params with specific values
    pub fn with_values(memory_cost: u32, time_cost: u32, parallelism: u32) -> Self {
        Self {
            memory_cost,
            time_cost,
            parallelism,
        }
    }

    /// Check the parameters against Argon2's limits and our own ceilings
    pub fn validate(&self) -> QuickBackupResult<()> {
        if self.memory_cost > MAX_MEMORY_COST || self.time_cost > MAX_TIME_COST {
            return Err(QuickBackupError::Config(format!(
                "Argon2 parameters too large: memory {} KiB, time {}",
                self.memory_cost, self.time_cost
            )));
        }
        self.to_argon2().map(|_| ())
    }

    fn to_argon2(self) -> QuickBackupResult<Params> {
        Params::new(
            self.memory_cost,
            self.time_cost,
            self.parallelism,
            Some(KEY_SIZE),
        )
        .map_err(|e| QuickBackupError::Config(format!("Invalid Argon2 parameters: {}", e)))
    }
}

/// A derived encryption key, zeroed on drop
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_SIZE],
}

impl DerivedKey {
    /// Get the key bytes
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.key
    }
}

/// Derive an encryption key from a passphrase and salt
pub fn derive_key(
    passphrase: &Passphrase,
    salt: &[u8],
    params: &KeyDerivationParams,
) -> QuickBackupResult<DerivedKey> {
    params.validate()?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params.to_argon2()?);

    let mut key = DerivedKey {
        key: [0u8; KEY_SIZE],
    };
    argon2
        .hash_password_into(passphrase.as_bytes(), salt, &mut key.key)
        .map_err(|e| QuickBackupError::Encryption(format!("Key derivation failed: {}", e)))?;

    Ok(key)
}
