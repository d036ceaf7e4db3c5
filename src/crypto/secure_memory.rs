//! Secure memory handling for sensitive data
//!
//! Provides types that zero their memory on drop so passphrases and
//! decrypted archives do not linger in the process after use.

use std::fmt;
use std::ops::Deref;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// A passphrase that zeros its contents on drop
///
/// The owner is expected to call [`Passphrase::wipe`] as soon as the
/// cipher call that needed it returns; dropping wipes it as well.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Passphrase {
    inner: String,
}

impl Passphrase {
    /// Create a new Passphrase
    pub fn new(s: impl Into<String>) -> Self {
        Self { inner: s.into() }
    }

    /// Get the passphrase bytes for key derivation
    pub fn as_bytes(&self) -> &[u8] {
        self.inner.as_bytes()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Zero the buffer now, leaving an empty passphrase behind
    pub fn wipe(&mut self) {
        self.inner.zeroize();
    }
}

impl From<String> for Passphrase {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for Passphrase {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// Don't print the contents in Debug output
impl fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Passphrase")
            .field("len", &self.inner.len())
            .finish()
    }
}

/// A byte vector that zeros its contents on drop
///
/// Holds decrypted archive bytes between the cipher and the filesystem.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecureBytes {
    inner: Vec<u8>,
}

impl SecureBytes {
    /// Create new SecureBytes
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            inner: bytes.into(),
        }
    }

    /// Get the bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.inner
    }
}

impl Deref for SecureBytes {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl fmt::Debug for SecureBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureBytes")
            .field("len", &self.inner.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passphrase_creation() {
        let p = Passphrase::new("secret123");
        assert_eq!(p.as_bytes(), b"secret123");
        assert!(!p.is_empty());
    }

    #[test]
    fn test_passphrase_wipe() {
        let mut p: Passphrase = "secret123".into();
        p.wipe();
        assert!(p.is_empty());
        assert_eq!(p.as_bytes(), b"");
    }

    #[test]
    fn test_passphrase_debug_is_redacted() {
        let p = Passphrase::new("secret");
        let debug = format!("{:?}", p);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("Passphrase"));
    }

    #[test]
    fn test_secure_bytes_derefs_to_slice() {
        let b = SecureBytes::new(vec![1, 2, 3]);
        assert_eq!(b.as_bytes(), &[1, 2, 3]);
        assert_eq!(&b[..2], &[1, 2]);
    }

    #[test]
    fn test_secure_bytes_debug() {
        let b = SecureBytes::new(vec![1, 2, 3, 4, 5]);
        let debug = format!("{:?}", b);
        assert!(debug.contains("SecureBytes"));
        assert!(debug.contains('5'));
    }
}
