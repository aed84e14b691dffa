//! Encrypted settings for ScholarVault.
//!
//! This module provides:
//! - Deployment configuration holding the master secret
//! - The key material provider that owns, validates and mints master secrets
//! - Self-contained ciphertext envelopes (`encrypted`, `salt`, `iv`)
//! - The encryption service used by API keys and user settings
//!
//! # Architecture
//! Callers hold either a plaintext or an [`Envelope`]. The
//! [`EncryptionService`] asks the [`KeyMaterialProvider`] for the master
//! secret at call time, derives a fresh key per envelope and performs
//! authenticated encryption or decryption. Nothing is cached between calls.

pub mod config;
pub mod envelope;
pub mod provider;
pub mod service;

pub use config::{SettingsConfig, KDF_PROFILE_ENV, MASTER_KEY_ENV, MODE_ENV};
pub use envelope::Envelope;
pub use provider::{KeyMaterialProvider, ValidationReport, MIN_SECRET_LENGTH};
pub use service::{EncryptionService, PayloadClass};
