//! Environment variable secret provider.
//!
//! Looks the key up directly as an environment variable name
//! (e.g., "GOOGLE_API_KEY"). A `.env` file loaded at startup ends up here too.

use mentorchat_core::repository::secret::SecretProvider;
use mentorchat_types::error::CredentialError;

/// Environment variable secret provider.
pub struct EnvSecretProvider;

impl EnvSecretProvider {
    /// Create a new environment variable secret provider.
    pub fn new() -> Self {
        Self
    }
}

impl Default for EnvSecretProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretProvider for EnvSecretProvider {
    async fn get(&self, key: &str) -> Result<Option<String>, CredentialError> {
        match std::env::var(key) {
            Ok(val) if val.trim().is_empty() => Ok(None),
            Ok(val) => Ok(Some(val)),
            Err(std::env::VarError::NotPresent) => Ok(None),
            Err(std::env::VarError::NotUnicode(_)) => {
                // Secrets must be valid strings; treat as not found.
                Ok(None)
            }
        }
    }
}
