//! Authenticated encryption using XChaCha20-Poly1305.
//!
//! XChaCha20-Poly1305 provides both confidentiality and authenticity,
//! with a 24-byte nonce that is safe for random generation.

use chacha20poly1305::{
    aead::{generic_array::GenericArray, Aead, KeyInit},
    XChaCha20Poly1305,
};

use crate::keys::{fill_random, KEY_LENGTH};
use scholarvault_common::{Error, Result};

/// Nonce size for XChaCha20-Poly1305 (24 bytes).
pub const NONCE_SIZE: usize = 24;

/// Authentication tag size (16 bytes).
pub const TAG_SIZE: usize = 16;

/// Raw XChaCha20-Poly1305 nonce.
pub type Nonce = [u8; NONCE_SIZE];

/// Generate a fresh random nonce.
pub fn generate_nonce() -> Nonce {
    let mut nonce = [0u8; NONCE_SIZE];
    fill_random(&mut nonce);
    nonce
}

/// Encrypt plaintext with the given nonce.
///
/// # Preconditions
/// - `key` must be exactly KEY_LENGTH bytes
/// - `nonce` must never have been used with `key` before
///
/// # Postconditions
/// - Returns ciphertext || tag, i.e. plaintext length + TAG_SIZE bytes
///
/// # Errors
/// - Returns error if key length is incorrect
/// - Returns error if encryption fails
pub fn encrypt_with_nonce(key: &[u8], nonce: &Nonce, plaintext: &[u8]) -> Result<Vec<u8>> {
    if key.len() != KEY_LENGTH {
        return Err(Error::Crypto(format!(
            "Invalid key length: expected {}, got {}",
            KEY_LENGTH,
            key.len()
        )));
    }

    let cipher = XChaCha20Poly1305::new(GenericArray::from_slice(key));

    cipher
        .encrypt(GenericArray::from_slice(nonce.as_slice()), plaintext)
        .map_err(|e| Error::Crypto(format!("Encryption failed: {}", e)))
}

/// Decrypt ciphertext with the given nonce.
///
/// # Errors
/// - Returns `Error::Decryption` for a bad key length, a short ciphertext
///   or a failed authentication check; the cases are not distinguished
///
/// # Security
/// - Authenticates before returning any plaintext
pub fn decrypt_with_nonce(key: &[u8], nonce: &Nonce, ciphertext: &[u8]) -> Result<Vec<u8>> {
    if key.len() != KEY_LENGTH || ciphertext.len() < TAG_SIZE {
        return Err(Error::Decryption);
    }

    let cipher = XChaCha20Poly1305::new(GenericArray::from_slice(key));

    cipher
        .decrypt(GenericArray::from_slice(nonce.as_slice()), ciphertext)
        .map_err(|_| Error::Decryption)
}
