//! Secret provider trait definition.

use mentorchat_types::error::CredentialError;

/// Read-only source of secret values (environment, later a keychain).
pub trait SecretProvider: Send + Sync {
    /// Retrieve a secret value by key.
    /// Returns None if the secret does not exist in this provider.
    fn get(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>, CredentialError>> + Send;

    /// Retrieve a secret that must be present.
    fn require(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<String, CredentialError>> + Send {
        async move {
            self.get(key)
                .await?
                .ok_or_else(|| CredentialError::Missing(key.to_string()))
        }
    }
}
