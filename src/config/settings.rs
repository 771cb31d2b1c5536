use std::path::Path;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::crypto::{generate_key, AesCbcHmac, Algorithm};
use crate::errors::{CbcHmacError, Result};

/// Which AES-CBC-HMAC variant to create keys for, loaded from
/// `aead-cbc-hmac.toml`.
///
/// Every field has a default so no config file is required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyTemplate {
    /// JWE `enc` identifier, e.g. "A256CBC-HS512".
    #[serde(default = "default_algorithm")]
    pub algorithm: Algorithm,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_algorithm() -> Algorithm {
    Algorithm::Aes256CbcHmacSha512
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for KeyTemplate {
    fn default() -> Self {
        Self {
            algorithm: default_algorithm(),
        }
    }
}

impl KeyTemplate {
    /// Name of the config file we look for.
    const FILE_NAME: &'static str = "aead-cbc-hmac.toml";

    /// Template for a specific variant.
    pub fn new(algorithm: Algorithm) -> Self {
        Self { algorithm }
    }

    /// Load the template from `<dir>/aead-cbc-hmac.toml`.
    ///
    /// If the file does not exist, defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(dir: &Path) -> Result<Self> {
        let config_path = dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        toml::from_str(&contents).map_err(|e| {
            CbcHmacError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })
    }

    /// Parse a template from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| CbcHmacError::ConfigError(e.to_string()))
    }

    /// Generate a fresh combined key of the template's size.
    pub fn new_key(&self) -> Result<Zeroizing<Vec<u8>>> {
        generate_key(self.algorithm)
    }

    /// Build a primitive over a freshly generated key.
    pub fn new_primitive(&self) -> Result<AesCbcHmac> {
        let key = self.new_key()?;
        AesCbcHmac::new(&key)
    }
}

// ── Tests ────────────────────────────────────────────────────────────
