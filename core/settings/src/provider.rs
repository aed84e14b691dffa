//! Key material provider.
//!
//! The single source of truth for which master secret protects settings.
//! Construction never fails; a missing secret only surfaces when an
//! operation needs it.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{SettingsConfig, MASTER_KEY_ENV};
use scholarvault_common::{DeploymentMode, Error, Result};
use scholarvault_crypto::{KdfParams, MasterSecret};

/// Shortest configured master secret accepted without a warning.
pub const MIN_SECRET_LENGTH: usize = 32;

/// Whether the deployment can currently perform encryption safely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// False when encryption must be considered unavailable.
    pub valid: bool,
    /// Human-readable warnings, in the order they were found.
    pub warnings: Vec<String>,
}

impl ValidationReport {
    fn new() -> Self {
        Self {
            valid: true,
            warnings: Vec::new(),
        }
    }

    fn warn(&mut self, message: String) {
        self.warnings.push(message);
    }

    fn fail(&mut self, message: String) {
        self.valid = false;
        self.warnings.push(message);
    }
}

/// Owns the process-wide master secret.
///
/// Immutable after construction. Rotating the secret means building a new
/// provider from new configuration.
#[derive(Debug)]
pub struct KeyMaterialProvider {
    secret: Option<MasterSecret>,
    mode: DeploymentMode,
    kdf_params: KdfParams,
}

impl KeyMaterialProvider {
    /// Create a provider from configuration.
    ///
    /// An empty or whitespace-only secret is treated as absent.
    pub fn new(config: SettingsConfig) -> Self {
        let secret = config
            .master_secret
            .filter(|s| !s.expose().trim().is_empty());

        debug!(
            mode = %config.mode,
            has_secret = secret.is_some(),
            "Key material provider initialised"
        );

        Self {
            secret,
            mode: config.mode,
            kdf_params: config.kdf_params,
        }
    }

    /// Get the current master secret.
    ///
    /// # Errors
    /// - Returns a configuration error if no secret is configured
    pub fn secret(&self) -> Result<&MasterSecret> {
        self.secret.as_ref().ok_or_else(|| {
            Error::Configuration(format!(
                "{} is not set; encrypted settings are unavailable",
                MASTER_KEY_ENV
            ))
        })
    }

    /// Check whether a secret is configured.
    pub fn has_secret(&self) -> bool {
        self.secret.is_some()
    }

    /// Get the deployment mode.
    pub fn mode(&self) -> DeploymentMode {
        self.mode
    }

    /// Get the KDF parameters.
    pub fn kdf_params(&self) -> &KdfParams {
        &self.kdf_params
    }

    /// Mint a candidate master secret for an operator to install.
    ///
    /// Has no effect on the secret this provider holds.
    pub fn generate_master_secret() -> MasterSecret {
        MasterSecret::generate()
    }

    /// Inspect whether the configured secret is usable.
    ///
    /// A missing secret is fatal only in production. Elsewhere it is reported
    /// as a warning so local development works, though every encrypt and
    /// decrypt call still fails until a secret is configured.
    pub fn validate_environment(&self) -> ValidationReport {
        let mut report = ValidationReport::new();
        let production = self.mode.is_production();

        match &self.secret {
            None if production => report.fail(format!(
                "{} is not set; it is required in production",
                MASTER_KEY_ENV
            )),
            None => report.warn(format!(
                "{} is not set; encryption operations will fail until it is configured",
                MASTER_KEY_ENV
            )),
            Some(secret) if secret.char_len() < MIN_SECRET_LENGTH => {
                let message = format!(
                    "{} is shorter than {} characters; generate a stronger key",
                    MASTER_KEY_ENV, MIN_SECRET_LENGTH
                );
                if production {
                    report.fail(message);
                } else {
                    report.warn(message);
                }
            }
            Some(_) => {}
        }

        if let Err(e) = self.kdf_params.validate() {
            report.fail(e.to_string());
        }

        for warning in &report.warnings {
            warn!(mode = %self.mode, "{}", warning);
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRONG: &str = "0123456789abcdef0123456789abcdef-strong";

    fn provider(mode: DeploymentMode, secret: Option<&str>) -> KeyMaterialProvider {
        let mut config = SettingsConfig::new(mode).with_kdf_params(KdfParams::moderate());
        if let Some(secret) = secret {
            config = config.with_master_secret(secret);
        }
        KeyMaterialProvider::new(config)
    }

    #[test]
    fn test_missing_secret_is_deferred() {
        let provider = provider(DeploymentMode::Production, None);

        assert!(!provider.has_secret());
        assert!(provider.secret().unwrap_err().is_configuration());
    }

    #[test]
    fn test_blank_secret_is_absent() {
        let provider = provider(DeploymentMode::Production, Some(" \t  "));

        assert!(!provider.has_secret());
        assert!(provider.secret().unwrap_err().is_configuration());
    }

    #[test]
    fn test_configured_secret_available() {
        let provider = provider(DeploymentMode::Development, Some(STRONG));

        assert_eq!(provider.secret().unwrap().expose(), STRONG);
    }

    #[test]
    fn test_missing_secret_invalid_in_production() {
        let report = provider(DeploymentMode::Production, None).validate_environment();

        assert!(!report.valid);
        assert!(!report.warnings.is_empty());
    }

    #[test]
    fn test_missing_secret_warns_in_development() {
        let report = provider(DeploymentMode::Development, None).validate_environment();

        assert!(report.valid);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains(MASTER_KEY_ENV));
    }

    #[test]
    fn test_strong_secret_is_valid() {
        let report = provider(DeploymentMode::Production, Some(STRONG)).validate_environment();

        assert!(report.valid);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_short_secret() {
        let prod = provider(DeploymentMode::Production, Some("short")).validate_environment();
        assert!(!prod.valid);

        let dev = provider(DeploymentMode::Development, Some("short")).validate_environment();
        assert!(dev.valid);
        assert_eq!(dev.warnings.len(), 1);
    }

    #[test]
    fn test_invalid_kdf_params_invalidate_report() {
        let config = SettingsConfig::new(DeploymentMode::Development)
            .with_master_secret(STRONG)
            .with_kdf_params(KdfParams {
                memory_cost: 1,
                time_cost: 0,
                parallelism: 0,
            });
        let report = KeyMaterialProvider::new(config).validate_environment();

        assert!(!report.valid);
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_generate_leaves_current_secret_alone() {
        let provider = provider(DeploymentMode::Development, Some(STRONG));
        let generated = KeyMaterialProvider::generate_master_secret();

        assert_ne!(generated.expose(), STRONG);
        assert_eq!(provider.secret().unwrap().expose(), STRONG);
    }

    #[test]
    fn test_report_serializes() {
        let report = provider(DeploymentMode::Production, None).validate_environment();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["valid"], serde_json::json!(false));
        assert!(json["warnings"].is_array());
    }
}
