//! Common types used throughout ScholarVault.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of deployment the process is running in.
///
/// Production is strict about key material; the other modes only warn so
/// local development works without a configured master secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentMode {
    Production,
    #[default]
    Development,
    Test,
}

impl DeploymentMode {
    /// Parse a mode from an environment value.
    ///
    /// `production` and `prod` (case-insensitive) select Production, `test`
    /// selects Test, anything else including an unset value is Development.
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("production") | Some("prod") => Self::Production,
            Some("test") => Self::Test,
            _ => Self::Development,
        }
    }

    /// Check if this is a production deployment.
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Get the canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Development => "development",
            Self::Test => "test",
        }
    }
}

impl fmt::Display for DeploymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_env_value() {
        assert_eq!(DeploymentMode::from_env_value(Some("production")), DeploymentMode::Production);
        assert_eq!(DeploymentMode::from_env_value(Some(" PROD ")), DeploymentMode::Production);
        assert_eq!(DeploymentMode::from_env_value(Some("test")), DeploymentMode::Test);
        assert_eq!(DeploymentMode::from_env_value(Some("staging")), DeploymentMode::Development);
        assert_eq!(DeploymentMode::from_env_value(None), DeploymentMode::Development);
    }

    #[test]
    fn test_only_production_is_production() {
        assert!(DeploymentMode::Production.is_production());
        assert!(!DeploymentMode::Development.is_production());
        assert!(!DeploymentMode::Test.is_production());
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(DeploymentMode::Production.to_string(), "production");
        assert_eq!(DeploymentMode::default().to_string(), "development");
    }
}
