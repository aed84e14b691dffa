//! Key types with secure memory handling.
//!
//! All secret-bearing types automatically zeroize their memory on drop to
//! prevent sensitive data from persisting in memory.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chacha20poly1305::aead::{rand_core::RngCore, OsRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Length of encryption keys in bytes (256-bit).
pub const KEY_LENGTH: usize = 32;

/// Length of key derivation salts in bytes.
pub const SALT_LENGTH: usize = 32;

/// Random bytes behind a generated master secret.
pub const GENERATED_SECRET_LENGTH: usize = 32;

/// Fill `buf` from the operating system CSPRNG.
pub fn fill_random(buf: &mut [u8]) {
    OsRng.fill_bytes(buf);
}

/// The process-wide secret that protects every stored setting.
///
/// Held as text because that is how operators configure it. It is only ever
/// used as Argon2id input, never directly as a cipher key.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct MasterSecret {
    secret: String,
}

impl MasterSecret {
    /// Wrap a configured secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Mint a fresh secret suitable for installing into configuration.
    ///
    /// # Postconditions
    /// - Encodes GENERATED_SECRET_LENGTH random bytes as padded base64
    ///   (44 characters)
    pub fn generate() -> Self {
        let mut bytes = Zeroizing::new([0u8; GENERATED_SECRET_LENGTH]);
        fill_random(&mut bytes[..]);
        Self::new(STANDARD.encode(&bytes[..]))
    }

    /// Get the secret bytes for key derivation.
    ///
    /// # Security
    /// The returned slice should be used immediately and not stored.
    pub fn as_bytes(&self) -> &[u8] {
        self.secret.as_bytes()
    }

    /// Get the secret text.
    ///
    /// Only meant for handing a freshly generated secret to an operator.
    pub fn expose(&self) -> &str {
        &self.secret
    }

    /// Length of the secret in characters.
    pub fn char_len(&self) -> usize {
        self.secret.chars().count()
    }

    /// Check if the secret is empty.
    pub fn is_empty(&self) -> bool {
        self.secret.is_empty()
    }
}

impl fmt::Debug for MasterSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MasterSecret([REDACTED])")
    }
}

/// Per-envelope key derived from the master secret and a salt.
///
/// Lives for the duration of a single encrypt or decrypt call.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_LENGTH],
}

impl DerivedKey {
    /// Create a derived key from raw bytes.
    pub fn from_bytes(key: [u8; KEY_LENGTH]) -> Self {
        Self { key }
    }

    /// Get the key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DerivedKey([REDACTED])")
    }
}

/// Salt for key derivation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Salt(pub [u8; SALT_LENGTH]);

impl Salt {
    /// Generate a random salt.
    pub fn generate() -> Self {
        let mut salt = [0u8; SALT_LENGTH];
        fill_random(&mut salt);
        Self(salt)
    }

    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; SALT_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Create from a slice, if it has exactly SALT_LENGTH bytes.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        <[u8; SALT_LENGTH]>::try_from(bytes).ok().map(Self)
    }

    /// Get the salt bytes.
    pub fn as_bytes(&self) -> &[u8; SALT_LENGTH] {
        &self.0
    }
}
