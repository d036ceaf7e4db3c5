//! Cryptographic functions for QuickBackup
//!
//! Provides AES-256-GCM encryption with Argon2id key derivation. The cipher
//! sees archives as opaque bytes and knows nothing about their structure.

pub mod encryption;
pub mod key_derivation;
pub mod secure_memory;

pub use encryption::{
    decrypt, decrypt_in_place, encrypt, encrypt_from, inspect, BlobHeader, MAX_BLOB_SIZE,
    MAX_PLAINTEXT_SIZE,
};
pub use key_derivation::{derive_key, DerivedKey, KeyDerivationParams};
pub use secure_memory::{Passphrase, SecureBytes};
