//! Common error types for ScholarVault.

use thiserror::Error;

/// Top-level error type for ScholarVault operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid input provided, e.g. an empty plaintext.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No usable configuration for the requested operation.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Decryption failed.
    ///
    /// Carries no detail on purpose: tag mismatch, malformed encoding and a
    /// wrong master secret must be indistinguishable to the caller.
    #[error("Decryption failed")]
    Decryption,

    /// Cryptographic operation failed on the encryption side.
    #[error("Cryptographic error: {0}")]
    Crypto(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Whether this error is a validation failure of caller input.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Error::InvalidInput(_))
    }

    /// Whether this error reports missing or unusable configuration.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration(_))
    }

    /// Whether this error is the generic decryption failure.
    pub fn is_decryption(&self) -> bool {
        matches!(self, Error::Decryption)
    }
}

/// Result type alias using the common Error.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decryption_message_is_generic() {
        assert_eq!(Error::Decryption.to_string(), "Decryption failed");
    }

    #[test]
    fn test_error_kind_predicates() {
        assert!(Error::InvalidInput("empty".into()).is_invalid_input());
        assert!(Error::Configuration("missing".into()).is_configuration());
        assert!(Error::Decryption.is_decryption());
        assert!(!Error::Crypto("x".into()).is_decryption());
    }
}
