//! Encryption service for API keys and user settings.
//!
//! Every encryption draws a fresh salt and nonce and derives a fresh key, so
//! two envelopes for the same plaintext are unlinkable. Decryption
//! re-derives the key from the envelope's own salt; nothing is cached.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use zeroize::{Zeroize, Zeroizing};

use crate::config::SettingsConfig;
use crate::envelope::Envelope;
use crate::provider::{KeyMaterialProvider, ValidationReport};
use scholarvault_common::{Error, Result};
use scholarvault_crypto::{decrypt_with_nonce, derive_key, encrypt_with_nonce, generate_nonce, Salt};

/// Kind of value being protected.
///
/// Both classes use identical cryptography. The distinction keeps call
/// sites self-documenting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadClass {
    ApiKey,
    Setting,
}

impl PayloadClass {
    /// Get the canonical snake_case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ApiKey => "api_key",
            Self::Setting => "setting",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::ApiKey => "API key",
            Self::Setting => "Setting value",
        }
    }
}

impl fmt::Display for PayloadClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stateless encrypt/decrypt front end over a [`KeyMaterialProvider`].
///
/// Cheap to clone and safe to share between threads.
#[derive(Debug, Clone)]
pub struct EncryptionService {
    provider: Arc<KeyMaterialProvider>,
}

impl EncryptionService {
    /// Create a service over an existing provider.
    pub fn new(provider: Arc<KeyMaterialProvider>) -> Self {
        Self { provider }
    }

    /// Create a service with its own provider built from configuration.
    pub fn from_config(config: SettingsConfig) -> Self {
        Self::new(Arc::new(KeyMaterialProvider::new(config)))
    }

    /// Get the key material provider.
    pub fn provider(&self) -> &KeyMaterialProvider {
        &self.provider
    }

    /// Encrypt a payload into a fresh envelope.
    ///
    /// `None` stands for a null or missing value.
    ///
    /// # Errors
    /// - `Error::InvalidInput` if the plaintext is missing or empty
    /// - `Error::Configuration` if no master secret is configured
    pub fn encrypt(&self, class: PayloadClass, plaintext: Option<&str>) -> Result<Envelope> {
        let plaintext = match plaintext {
            Some(p) if !p.is_empty() => p,
            Some(_) => {
                return Err(Error::InvalidInput(format!("{} cannot be empty", class.label())))
            }
            None => return Err(Error::InvalidInput(format!("{} is required", class.label()))),
        };

        let secret = self.provider.secret()?;
        let salt = Salt::generate();
        let nonce = generate_nonce();

        let key = derive_key(secret.as_bytes(), &salt, self.provider.kdf_params())?;
        let ciphertext = encrypt_with_nonce(key.as_bytes(), &nonce, plaintext.as_bytes())?;

        debug!(class = %class, "Encrypted payload");
        Ok(Envelope::seal(&salt, &nonce, &ciphertext))
    }

    /// Decrypt an envelope back to its plaintext.
    ///
    /// # Errors
    /// - `Error::Configuration` if no master secret is configured
    /// - `Error::Decryption` for tampering, malformed fields or a master
    ///   secret other than the one used to encrypt
    pub fn decrypt(&self, class: PayloadClass, envelope: &Envelope) -> Result<String> {
        let secret = self.provider.secret()?;
        let decoded = envelope.decode()?;

        let key = derive_key(secret.as_bytes(), &decoded.salt, self.provider.kdf_params())?;
        let plaintext = decrypt_with_nonce(key.as_bytes(), &decoded.nonce, &decoded.ciphertext)
            .inspect_err(|_| debug!(class = %class, "Envelope failed authentication"))?;

        let text = String::from_utf8(plaintext).map_err(|e| {
            e.into_bytes().zeroize();
            debug!(class = %class, "Authenticated plaintext is not UTF-8");
            Error::Decryption
        })?;

        debug!(class = %class, "Decrypted payload");
        Ok(text)
    }

    /// Encrypt an API key.
    pub fn encrypt_api_key(&self, api_key: &str) -> Result<Envelope> {
        self.encrypt(PayloadClass::ApiKey, Some(api_key))
    }

    /// Decrypt an API key.
    pub fn decrypt_api_key(&self, envelope: &Envelope) -> Result<String> {
        self.decrypt(PayloadClass::ApiKey, envelope)
    }

    /// Encrypt a serialized setting.
    pub fn encrypt_setting(&self, value: &str) -> Result<Envelope> {
        self.encrypt(PayloadClass::Setting, Some(value))
    }

    /// Decrypt a serialized setting.
    pub fn decrypt_setting(&self, envelope: &Envelope) -> Result<String> {
        self.decrypt(PayloadClass::Setting, envelope)
    }

    /// Serialize a structured setting to JSON and encrypt it.
    pub fn encrypt_setting_value<T: Serialize + ?Sized>(&self, value: &T) -> Result<Envelope> {
        let json = Zeroizing::new(
            serde_json::to_string(value).map_err(|e| Error::Serialization(e.to_string()))?,
        );
        self.encrypt_setting(&json)
    }

    /// Decrypt a setting and deserialize it from JSON.
    pub fn decrypt_setting_value<T: DeserializeOwned>(&self, envelope: &Envelope) -> Result<T> {
        let json = Zeroizing::new(self.decrypt_setting(envelope)?);
        serde_json::from_str(&json).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Run [`encrypt`](Self::encrypt) on the blocking thread pool.
    ///
    /// Key derivation is CPU-bound; this keeps it off async worker threads.
    pub async fn encrypt_offloaded(
        &self,
        class: PayloadClass,
        plaintext: String,
    ) -> Result<Envelope> {
        let service = self.clone();
        let plaintext = Zeroizing::new(plaintext);

        tokio::task::spawn_blocking(move || service.encrypt(class, Some(plaintext.as_str())))
            .await
            .map_err(|e| Error::Crypto(format!("Encryption task failed: {}", e)))?
    }

    /// Run [`decrypt`](Self::decrypt) on the blocking thread pool.
    pub async fn decrypt_offloaded(
        &self,
        class: PayloadClass,
        envelope: Envelope,
    ) -> Result<String> {
        let service = self.clone();

        tokio::task::spawn_blocking(move || service.decrypt(class, &envelope))
            .await
            .map_err(|e| Error::Crypto(format!("Decryption task failed: {}", e)))?
    }

    /// Report whether the deployment can encrypt safely.
    pub fn validate_environment(&self) -> ValidationReport {
        self.provider.validate_environment()
    }

    /// Generate a candidate master key for configuration.
    pub fn generate_master_key() -> String {
        KeyMaterialProvider::generate_master_secret().expose().to_string()
    }
}
