//! LLM provider implementations.
//!
//! Contains the Gemini implementation of the [`LlmProvider`] trait defined in
//! `mentorchat-core`, and [`GeminiClientFactory`], which binds it to a system
//! prompt for the client cache.
//!
//! [`LlmProvider`]: mentorchat_core::llm::provider::LlmProvider

pub mod gemini;

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use mentorchat_core::chat::client::{ClientFactory, ModelClient, ModelSettings};
use mentorchat_core::llm::box_provider::BoxLlmProvider;
use mentorchat_types::config::MentorConfig;
use mentorchat_types::error::ClientConstructionError;

use self::gemini::GeminiProvider;
use self::gemini::config::{GEMINI_BASE_URL, GeminiConfig};

/// Generation settings derived from the loaded configuration.
pub fn model_settings(config: &MentorConfig) -> ModelSettings {
    ModelSettings {
        model: config.model.clone(),
        max_tokens: config.max_tokens,
        temperature: Some(config.temperature),
        request_timeout: Duration::from_secs(config.request_timeout_secs.max(1)),
    }
}

/// Builds Gemini-backed [`ModelClient`]s.
///
/// Holds the API key for the lifetime of the process; each build creates a
/// fresh HTTP client bound to one system prompt.
pub struct GeminiClientFactory {
    api_key: SecretString,
    base_url: String,
    settings: ModelSettings,
}

impl GeminiClientFactory {
    pub fn new(api_key: SecretString, settings: ModelSettings) -> Self {
        Self {
            api_key,
            base_url: GEMINI_BASE_URL.to_string(),
            settings,
        }
    }

    /// Factory for the loaded configuration, honouring `base_url` overrides.
    pub fn from_config(config: &MentorConfig, api_key: SecretString) -> Self {
        let factory = Self::new(api_key, model_settings(config));
        match config.base_url.as_deref() {
            Some(base_url) => factory.with_base_url(base_url),
            None => factory,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl ClientFactory for GeminiClientFactory {
    fn build(&self, system_prompt: &str) -> Result<ModelClient, ClientConstructionError> {
        if self.api_key.expose_secret().trim().is_empty() {
            return Err(ClientConstructionError::InvalidConfig(
                "API key is empty".to_string(),
            ));
        }
        if !(self.base_url.starts_with("https://") || self.base_url.starts_with("http://")) {
            return Err(ClientConstructionError::InvalidConfig(format!(
                "base URL must be http(s): {}",
                self.base_url
            )));
        }

        let config = GeminiConfig::new(self.api_key.clone(), self.settings.model.clone())
            .with_base_url(self.base_url.clone());
        let provider = GeminiProvider::new(config);

        tracing::debug!(
            model = %self.settings.model,
            base_url = %self.base_url,
            "Constructed Gemini model client"
        );
        ModelClient::new(
            BoxLlmProvider::new(provider),
            system_prompt,
            self.settings.clone(),
        )
    }
}
