//! AES-256-GCM encryption/decryption of whole blobs
//!
//! Every blob carries its own header (format version, KDF parameters, salt
//! and nonce), so decryption needs nothing but the blob and the passphrase.
//! The header is authenticated as associated data, so any flipped byte in
//! the header, ciphertext or tag is rejected.
//!
//! Layout (integers little-endian):
//!
//! ```text
//! magic "QBAK" | version u8 | algorithm u8 | memory u32 | time u32 | lanes u32
//! | salt [16] | nonce [12] | ciphertext || tag [16]
//! ```

use std::io::Read;

use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::{
    aead::{AeadInPlace, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use tracing::debug;
use zeroize::Zeroize;

use crate::error::{QuickBackupError, QuickBackupResult};

use super::key_derivation::SALT_SIZE;
use super::{derive_key, KeyDerivationParams, Passphrase, SecureBytes};

/// Leading bytes identifying a QuickBackup blob
pub const MAGIC: &[u8; 4] = b"QBAK";

/// Current blob format version
pub const FORMAT_VERSION: u8 = 1;

/// Algorithm id: Argon2id key derivation + AES-256-GCM
pub const ALG_ARGON2ID_AES256GCM: u8 = 1;

/// Size of the AES-GCM nonce in bytes (96 bits)
pub const NONCE_SIZE: usize = 12;

/// Size of the AES-GCM authentication tag
pub const TAG_SIZE: usize = 16;

/// Total size of the serialized header
pub const HEADER_SIZE: usize = 4 + 1 + 1 + 4 * 3 + SALT_SIZE + NONCE_SIZE;

/// Largest plaintext a single blob may carry (4 GiB)
///
/// The whole archive is sealed as one AES-GCM message held in memory, so
/// this also bounds the memory a backup or restore needs.
pub const MAX_PLAINTEXT_SIZE: u64 = 4 * 1024 * 1024 * 1024;

/// Largest blob [`decrypt_in_place`] is ever handed
pub const MAX_BLOB_SIZE: u64 = MAX_PLAINTEXT_SIZE + (HEADER_SIZE + TAG_SIZE) as u64;

/// Parsed blob header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobHeader {
    pub version: u8,
    pub algorithm: u8,
    pub kdf: KeyDerivationParams,
    pub salt: [u8; SALT_SIZE],
    pub nonce: [u8; NONCE_SIZE],
    /// Length of ciphertext plus tag following the header
    pub payload_len: usize,
}

impl BlobHeader {
    fn fresh(kdf: KeyDerivationParams) -> Self {
        let mut salt = [0u8; SALT_SIZE];
        let mut nonce = [0u8; NONCE_SIZE];
        OsRng.fill_bytes(&mut salt);
        OsRng.fill_bytes(&mut nonce);

        Self {
            version: FORMAT_VERSION,
            algorithm: ALG_ARGON2ID_AES256GCM,
            kdf,
            salt,
            nonce,
            payload_len: 0,
        }
    }

    /// Serialize the header (without payload)
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_SIZE);
        out.extend_from_slice(MAGIC);
        out.push(self.version);
        out.push(self.algorithm);
        out.extend_from_slice(&self.kdf.memory_cost.to_le_bytes());
        out.extend_from_slice(&self.kdf.time_cost.to_le_bytes());
        out.extend_from_slice(&self.kdf.parallelism.to_le_bytes());
        out.extend_from_slice(&self.salt);
        out.extend_from_slice(&self.nonce);
        out
    }

    /// Parse and sanity-check the header of a blob
    ///
    /// Returns a descriptive message on failure; callers on the decrypt path
    /// fold it into [`QuickBackupError::Decryption`].
    pub fn parse(blob: &[u8]) -> Result<Self, String> {
        if blob.len() < HEADER_SIZE + TAG_SIZE {
            return Err(format!("blob too short: {} bytes", blob.len()));
        }
        if &blob[..4] != MAGIC {
            return Err("bad magic".to_string());
        }

        let version = blob[4];
        if version != FORMAT_VERSION {
            return Err(format!("unsupported format version: {}", version));
        }
        let algorithm = blob[5];
        if algorithm != ALG_ARGON2ID_AES256GCM {
            return Err(format!("unsupported algorithm: {}", algorithm));
        }

        let kdf = KeyDerivationParams::with_values(
            read_u32(blob, 6),
            read_u32(blob, 10),
            read_u32(blob, 14),
        );
        kdf.validate().map_err(|e| e.to_string())?;

        let mut salt = [0u8; SALT_SIZE];
        salt.copy_from_slice(&blob[18..18 + SALT_SIZE]);
        let mut nonce = [0u8; NONCE_SIZE];
        nonce.copy_from_slice(&blob[18 + SALT_SIZE..HEADER_SIZE]);

        Ok(Self {
            version,
            algorithm,
            kdf,
            salt,
            nonce,
            payload_len: blob.len() - HEADER_SIZE,
        })
    }

    /// Human-readable algorithm name
    pub fn algorithm_name(&self) -> &'static str {
        match self.algorithm {
            ALG_ARGON2ID_AES256GCM => "Argon2id + AES-256-GCM",
            _ => "unknown",
        }
    }
}

fn read_u32(buf: &[u8], offset: usize) -> u32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&buf[offset..offset + 4]);
    u32::from_le_bytes(bytes)
}

/// Encrypt plaintext into a self-contained blob
///
/// Generates a fresh salt and nonce on every call, so encrypting the same
/// plaintext twice never yields the same blob.
pub fn encrypt(
    plaintext: &[u8],
    passphrase: &Passphrase,
    params: &KeyDerivationParams,
) -> QuickBackupResult<Vec<u8>> {
    encrypt_from(plaintext, plaintext.len() as u64, passphrase, params)
}

/// Encrypt exactly `len` bytes read from `reader`
///
/// The plaintext is read straight into the blob buffer and sealed in place,
/// so the only full-size allocation is the blob itself.
pub fn encrypt_from<R: Read>(
    mut reader: R,
    len: u64,
    passphrase: &Passphrase,
    params: &KeyDerivationParams,
) -> QuickBackupResult<Vec<u8>> {
    let body_len = usize::try_from(len)
        .ok()
        .filter(|_| len <= MAX_PLAINTEXT_SIZE)
        .ok_or_else(|| {
            QuickBackupError::Encryption(format!(
                "Plaintext of {} bytes exceeds the {} byte limit",
                len, MAX_PLAINTEXT_SIZE
            ))
        })?;

    let header = BlobHeader::fresh(*params);
    let key = derive_key(passphrase, &header.salt, params)?;

    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| QuickBackupError::Encryption(format!("Failed to create cipher: {}", e)))?;

    let mut blob = Vec::with_capacity(HEADER_SIZE + body_len + TAG_SIZE);
    blob.extend_from_slice(&header.to_bytes());

    let read = reader.by_ref().take(len).read_to_end(&mut blob);
    if let Err(e) = read {
        blob.zeroize();
        return Err(QuickBackupError::Encryption(format!(
            "Failed to read plaintext: {}",
            e
        )));
    }
    if blob.len() != HEADER_SIZE + body_len {
        let got = blob.len() - HEADER_SIZE;
        blob.zeroize();
        return Err(QuickBackupError::Encryption(format!(
            "Plaintext ended after {} of {} bytes",
            got, len
        )));
    }

    let (aad, body) = blob.split_at_mut(HEADER_SIZE);
    let tag = match cipher.encrypt_in_place_detached(Nonce::from_slice(&header.nonce), aad, body) {
        Ok(tag) => tag,
        Err(e) => {
            blob.zeroize();
            return Err(QuickBackupError::Encryption(format!("Encryption failed: {}", e)));
        }
    };

    blob.extend_from_slice(&tag);
    Ok(blob)
}

/// Decrypt a blob produced by [`encrypt`]
///
/// Every failure mode collapses into [`QuickBackupError::Decryption`].
pub fn decrypt(blob: &[u8], passphrase: &Passphrase) -> QuickBackupResult<SecureBytes> {
    decrypt_in_place(blob.to_vec(), passphrase)
}

/// Decrypt an owned blob, reusing its buffer for the plaintext
///
/// On failure the buffer is zeroed before it is dropped.
pub fn decrypt_in_place(
    mut blob: Vec<u8>,
    passphrase: &Passphrase,
) -> QuickBackupResult<SecureBytes> {
    let header = BlobHeader::parse(&blob).map_err(|reason| {
        debug!(%reason, "rejecting blob header");
        QuickBackupError::Decryption
    })?;

    let key = derive_key(passphrase, &header.salt, &header.kdf).map_err(|e| {
        debug!(error = %e, "key derivation failed during decrypt");
        QuickBackupError::Decryption
    })?;

    let cipher =
        Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| QuickBackupError::Decryption)?;

    let body_end = blob.len() - TAG_SIZE;
    let tag = GenericArray::clone_from_slice(&blob[body_end..]);
    let (aad, body) = blob[..body_end].split_at_mut(HEADER_SIZE);

    if cipher
        .decrypt_in_place_detached(Nonce::from_slice(&header.nonce), aad, body, &tag)
        .is_err()
    {
        // The buffer may hold unauthenticated plaintext at this point
        blob.zeroize();
        debug!("authentication tag mismatch");
        return Err(QuickBackupError::Decryption);
    }

    blob.truncate(body_end);
    blob.drain(..HEADER_SIZE);
    Ok(SecureBytes::new(blob))
}

/// Read the header of a blob without decrypting it
pub fn inspect(blob: &[u8]) -> QuickBackupResult<BlobHeader> {
    BlobHeader::parse(blob)
        .map_err(|reason| QuickBackupError::ArchiveRead(format!("Not a valid backup: {}", reason)))
}
