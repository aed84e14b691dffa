//! Deployment configuration for encrypted settings.

use scholarvault_common::{DeploymentMode, Error, Result};
use scholarvault_crypto::{KdfParams, MasterSecret};

/// Environment variable carrying the master secret.
pub const MASTER_KEY_ENV: &str = "ENCRYPTION_MASTER_KEY";

/// Environment variable selecting the deployment mode.
pub const MODE_ENV: &str = "APP_ENV";

/// Environment variable selecting a KDF preset.
pub const KDF_PROFILE_ENV: &str = "ENCRYPTION_KDF_PROFILE";

/// Configuration read once at startup.
///
/// A missing master secret is legal here. It only becomes an error when an
/// operation actually needs the secret.
#[derive(Debug, Clone, Default)]
pub struct SettingsConfig {
    /// Master secret, if one is configured.
    pub master_secret: Option<MasterSecret>,
    /// Deployment mode.
    pub mode: DeploymentMode,
    /// Argon2id parameters used for every envelope.
    pub kdf_params: KdfParams,
}

impl SettingsConfig {
    /// Create a configuration without a master secret.
    pub fn new(mode: DeploymentMode) -> Self {
        Self {
            master_secret: None,
            mode,
            kdf_params: KdfParams::default(),
        }
    }

    /// Set the master secret.
    pub fn with_master_secret(mut self, secret: impl Into<String>) -> Self {
        self.master_secret = Some(MasterSecret::new(secret));
        self
    }

    /// Set KDF parameters.
    pub fn with_kdf_params(mut self, params: KdfParams) -> Self {
        self.kdf_params = params;
        self
    }

    /// Load configuration from the process environment.
    ///
    /// # Errors
    /// - Unknown KDF profile name
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through a lookup function.
    ///
    /// An empty or whitespace-only master secret counts as absent.
    ///
    /// # Errors
    /// - Unknown KDF profile name
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mode = DeploymentMode::from_env_value(lookup(MODE_ENV).as_deref());

        let master_secret = lookup(MASTER_KEY_ENV)
            .filter(|s| !s.trim().is_empty())
            .map(MasterSecret::new);

        let kdf_params = match lookup(KDF_PROFILE_ENV).filter(|p| !p.trim().is_empty()) {
            Some(profile) => KdfParams::from_profile(&profile).ok_or_else(|| {
                Error::Configuration(format!(
                    "Unknown KDF profile '{}'. Use: interactive, moderate, or sensitive",
                    profile
                ))
            })?,
            None => KdfParams::default(),
        };

        Ok(Self {
            master_secret,
            mode,
            kdf_params,
        })
    }
}
