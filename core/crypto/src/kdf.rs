//! Key derivation using Argon2id.
//!
//! Argon2id is a memory-hard password hashing function that provides
//! resistance to both GPU and time-memory trade-off attacks, which matters
//! when the configured master secret has only moderate entropy.

use argon2::{Algorithm, Argon2, Params, Version};
use serde::{Deserialize, Serialize};

use crate::keys::{DerivedKey, Salt, KEY_LENGTH};
use scholarvault_common::{Error, Result};

/// Parameters for Argon2id key derivation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// Memory cost in KiB (e.g., 65536 = 64 MiB).
    pub memory_cost: u32,
    /// Number of iterations.
    pub time_cost: u32,
    /// Degree of parallelism.
    pub parallelism: u32,
}

impl KdfParams {
    /// Create parameters suitable for interactive use.
    ///
    /// These parameters provide a balance between security and usability,
    /// targeting approximately 0.5-1 second of derivation time.
    pub fn interactive() -> Self {
        Self {
            memory_cost: 65536, // 64 MiB
            time_cost: 3,
            parallelism: 4,
        }
    }

    /// Create parameters suitable for sensitive data.
    ///
    /// Higher security parameters that may take several seconds.
    pub fn sensitive() -> Self {
        Self {
            memory_cost: 262144, // 256 MiB
            time_cost: 4,
            parallelism: 4,
        }
    }

    /// Create moderate parameters for constrained hosts.
    pub fn moderate() -> Self {
        Self {
            memory_cost: 32768, // 32 MiB
            time_cost: 3,
            parallelism: 2,
        }
    }

    /// Look up a preset by name.
    pub fn from_profile(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "interactive" => Some(Self::interactive()),
            "moderate" => Some(Self::moderate()),
            "sensitive" => Some(Self::sensitive()),
            _ => None,
        }
    }

    /// Check that Argon2 accepts these parameters.
    ///
    /// # Errors
    /// - Returns a configuration error describing the rejected parameter
    pub fn validate(&self) -> Result<()> {
        self.to_argon2().map(|_| ())
    }

    fn to_argon2(&self) -> Result<Params> {
        Params::new(
            self.memory_cost,
            self.time_cost,
            self.parallelism,
            Some(KEY_LENGTH),
        )
        .map_err(|e| Error::Configuration(format!("Invalid KDF parameters: {}", e)))
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        Self::interactive()
    }
}

/// Derive an encryption key from the master secret and a salt using Argon2id.
///
/// # Preconditions
/// - `secret` must not be empty
/// - `params` must have valid Argon2id parameters
///
/// # Postconditions
/// - Returns a DerivedKey of KEY_LENGTH bytes
/// - The derived key is deterministic given the same inputs
///
/// # Errors
/// - Returns error if secret is empty
/// - Returns error if Argon2id parameters are invalid
///
/// # Security
/// - Secret is not stored or logged
pub fn derive_key(secret: &[u8], salt: &Salt, params: &KdfParams) -> Result<DerivedKey> {
    if secret.is_empty() {
        return Err(Error::InvalidInput("Master secret cannot be empty".to_string()));
    }

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params.to_argon2()?);

    let mut key_bytes = [0u8; KEY_LENGTH];
    argon2
        .hash_password_into(secret, salt.as_bytes(), &mut key_bytes)
        .map_err(|e| Error::Crypto(format!("Key derivation failed: {}", e)))?;

    Ok(DerivedKey::from_bytes(key_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_key_deterministic() {
        let secret = b"test-secret-123";
        let salt = Salt::from_bytes([42u8; 32]);
        let params = KdfParams::moderate();

        let key1 = derive_key(secret, &salt, &params).unwrap();
        let key2 = derive_key(secret, &salt, &params).unwrap();

        assert_eq!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_derive_key_different_salt() {
        let secret = b"test-secret-123";
        let salt1 = Salt::from_bytes([1u8; 32]);
        let salt2 = Salt::from_bytes([2u8; 32]);
        let params = KdfParams::moderate();

        let key1 = derive_key(secret, &salt1, &params).unwrap();
        let key2 = derive_key(secret, &salt2, &params).unwrap();

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_derive_key_different_secret() {
        let salt = Salt::from_bytes([42u8; 32]);
        let params = KdfParams::moderate();

        let key1 = derive_key(b"secret1", &salt, &params).unwrap();
        let key2 = derive_key(b"secret2", &salt, &params).unwrap();

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_derive_key_empty_secret_fails() {
        let salt = Salt::generate();
        let params = KdfParams::moderate();

        let err = derive_key(b"", &salt, &params).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_invalid_params_rejected() {
        let params = KdfParams {
            memory_cost: 1,
            time_cost: 0,
            parallelism: 0,
        };

        assert!(params.validate().unwrap_err().is_configuration());
        assert!(derive_key(b"secret", &Salt::generate(), &params).is_err());
    }

    #[test]
    fn test_presets_are_valid() {
        for name in ["interactive", "moderate", "Sensitive"] {
            let params = KdfParams::from_profile(name).unwrap();
            assert!(params.validate().is_ok());
        }
        assert!(KdfParams::from_profile("fast").is_none());
    }
}
