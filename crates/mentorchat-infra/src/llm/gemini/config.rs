//! Connection settings for the Gemini OpenAI-compatible endpoint.

use secrecy::SecretString;

/// Default Gemini base URL (OpenAI-compatible beta endpoint).
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// Provider name reported in logs and spans.
pub const PROVIDER_NAME: &str = "gemini";

/// Configuration used to construct a [`super::GeminiProvider`].
pub struct GeminiConfig {
    pub base_url: String,
    pub api_key: SecretString,
    /// Fallback when a request carries no model.
    pub model: String,
}

impl GeminiConfig {
    /// Configuration against the public Gemini endpoint.
    pub fn new(api_key: SecretString, model: impl Into<String>) -> Self {
        Self {
            base_url: GEMINI_BASE_URL.to_string(),
            api_key,
            model: model.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_public_endpoint() {
        let config = GeminiConfig::new(SecretString::from("key"), "gemini-2.0-flash");
        assert_eq!(config.base_url, GEMINI_BASE_URL);
        assert_eq!(config.model, "gemini-2.0-flash");

        let config = config.with_base_url("http://localhost:8080/v1");
        assert_eq!(config.base_url, "http://localhost:8080/v1");
    }
}
