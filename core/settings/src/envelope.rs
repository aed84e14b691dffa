//! Ciphertext envelopes.
//!
//! An envelope is the unit of stored protected data. It is self-contained:
//! decrypting needs nothing but the envelope and the master secret. All
//! three fields are standard padded base64 so they can live in JSON or a
//! text column.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use scholarvault_common::{Error, Result};
use scholarvault_crypto::{Nonce, Salt, TAG_SIZE};

/// Encrypted value with the salt and nonce needed to open it.
///
/// Callers store and transmit envelopes verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Ciphertext followed by the Poly1305 tag.
    pub encrypted: String,
    /// Argon2id salt.
    pub salt: String,
    /// XChaCha20-Poly1305 nonce.
    pub iv: String,
}

/// Binary form of an envelope, only produced from well-formed input.
pub(crate) struct DecodedEnvelope {
    pub salt: Salt,
    pub nonce: Nonce,
    pub ciphertext: Vec<u8>,
}

impl fmt::Debug for DecodedEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DecodedEnvelope([REDACTED; {} bytes])",
            self.ciphertext.len()
        )
    }
}

impl Envelope {
    /// Build an envelope from freshly produced binary parts.
    pub(crate) fn seal(salt: &Salt, nonce: &Nonce, ciphertext: &[u8]) -> Self {
        Self {
            encrypted: STANDARD.encode(ciphertext),
            salt: STANDARD.encode(salt.as_bytes()),
            iv: STANDARD.encode(nonce),
        }
    }

    /// Decode the text fields.
    ///
    /// # Errors
    /// - `Error::Decryption` for any malformed field; which one is only
    ///   recorded in debug logs
    pub(crate) fn decode(&self) -> Result<DecodedEnvelope> {
        let salt = decode_field("salt", &self.salt)
            .and_then(|bytes| Salt::from_slice(&bytes).ok_or("salt has the wrong length"));
        let nonce = decode_field("iv", &self.iv).and_then(|bytes| {
            <Nonce>::try_from(bytes.as_slice()).map_err(|_| "iv has the wrong length")
        });
        let ciphertext = decode_field("encrypted", &self.encrypted).and_then(|bytes| {
            if bytes.len() < TAG_SIZE {
                Err("encrypted is shorter than the authentication tag")
            } else {
                Ok(bytes)
            }
        });

        match (salt, nonce, ciphertext) {
            (Ok(salt), Ok(nonce), Ok(ciphertext)) => Ok(DecodedEnvelope {
                salt,
                nonce,
                ciphertext,
            }),
            (salt, nonce, ciphertext) => {
                let reason = [salt.err(), nonce.err(), ciphertext.err()]
                    .into_iter()
                    .flatten()
                    .next()
                    .unwrap_or("malformed envelope");
                debug!(reason, "Rejecting malformed envelope");
                Err(Error::Decryption)
            }
        }
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Serialize to indented JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))
    }
}

fn decode_field(name: &'static str, value: &str) -> std::result::Result<Vec<u8>, &'static str> {
    STANDARD.decode(value).map_err(|_| match name {
        "salt" => "salt is not valid base64",
        "iv" => "iv is not valid base64",
        _ => "encrypted is not valid base64",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use scholarvault_crypto::{generate_nonce, NONCE_SIZE, SALT_LENGTH};

    fn sample() -> Envelope {
        Envelope::seal(&Salt::generate(), &generate_nonce(), &[9u8; TAG_SIZE + 4])
    }

    #[test]
    fn test_seal_then_decode() {
        let salt = Salt::generate();
        let nonce = generate_nonce();
        let ciphertext = vec![3u8; TAG_SIZE + 10];

        let decoded = Envelope::seal(&salt, &nonce, &ciphertext).decode().unwrap();

        assert_eq!(decoded.salt, salt);
        assert_eq!(decoded.nonce, nonce);
        assert_eq!(decoded.ciphertext, ciphertext);
    }

    #[test]
    fn test_decoded_debug_is_redacted() {
        let decoded = Envelope::seal(&Salt::generate(), &generate_nonce(), &[0xAB; TAG_SIZE])
            .decode()
            .unwrap();

        assert_eq!(format!("{:?}", decoded), "DecodedEnvelope([REDACTED; 16 bytes])");
    }

    #[test]
    fn test_invalid_text_rejected() {
        let envelope = Envelope {
            encrypted: "invalid-data".to_string(),
            salt: "invalid".to_string(),
            iv: "invalid".to_string(),
        };

        assert!(envelope.decode().unwrap_err().is_decryption());
    }

    #[test]
    fn test_wrong_lengths_rejected() {
        let mut short_salt = sample();
        short_salt.salt = STANDARD.encode([1u8; SALT_LENGTH - 1]);
        assert!(short_salt.decode().is_err());

        let mut long_iv = sample();
        long_iv.iv = STANDARD.encode([1u8; NONCE_SIZE + 1]);
        assert!(long_iv.decode().is_err());

        let mut short_ct = sample();
        short_ct.encrypted = STANDARD.encode([1u8; TAG_SIZE - 1]);
        assert!(short_ct.decode().is_err());
    }

    #[test]
    fn test_json_field_names() {
        let envelope = sample();
        let value: serde_json::Value = serde_json::from_str(&envelope.to_json().unwrap()).unwrap();

        let mut keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, ["encrypted", "iv", "salt"]);

        assert_eq!(Envelope::from_json(&envelope.to_json_pretty().unwrap()).unwrap(), envelope);
    }

    #[test]
    fn test_from_json_rejects_missing_field() {
        let err = Envelope::from_json(r#"{"encrypted":"AAAA","salt":"AAAA"}"#).unwrap_err();

        assert!(matches!(err, Error::Serialization(_)));
    }
}
