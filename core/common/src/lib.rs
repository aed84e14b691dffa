//! Common utilities and types shared across ScholarVault modules.
//!
//! This module provides the error type every crate in the workspace returns,
//! plus the deployment mode that decides how strict environment checks are.

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::DeploymentMode;
