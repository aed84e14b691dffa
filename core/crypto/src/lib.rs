//! Cryptographic primitives for ScholarVault.
//!
//! This module provides:
//! - Key derivation from the master secret using Argon2id
//! - Authenticated encryption using XChaCha20-Poly1305
//! - Master secret, salt and derived key types with automatic zeroization
//! - Secure randomness from the operating system
//!
//! # Security Guarantees
//! - All key material is automatically zeroized on drop
//! - No plaintext or key material is ever logged
//! - Every decryption failure surfaces as the same error

pub mod aead;
pub mod kdf;
pub mod keys;

pub use aead::{decrypt_with_nonce, encrypt_with_nonce, generate_nonce, Nonce, NONCE_SIZE, TAG_SIZE};
pub use kdf::{derive_key, KdfParams};
pub use keys::{fill_random, DerivedKey, MasterSecret, Salt, KEY_LENGTH, SALT_LENGTH};
