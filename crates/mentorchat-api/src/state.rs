//! Application state wiring the controller, client cache and session store.
//!
//! AppState is shared by the terminal chat and the REST API. The concrete
//! Gemini factory is only pinned in [`AppState::init`]; tests build the
//! state from any [`ClientFactory`].

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use dashmap::DashMap;
use secrecy::SecretString;
use tokio::sync::Mutex;
use uuid::Uuid;

use mentorchat_core::chat::cache::ClientCache;
use mentorchat_core::chat::client::ClientFactory;
use mentorchat_core::chat::reminder::ReminderPolicy;
use mentorchat_core::chat::session::{SessionController, SessionSettings, SessionState};
use mentorchat_core::repository::secret::SecretProvider;
use mentorchat_infra::config::load_config;
use mentorchat_infra::filesystem::{ensure_data_dir, resolve_data_dir};
use mentorchat_infra::llm::GeminiClientFactory;
use mentorchat_infra::secret::env::EnvSecretProvider;
use mentorchat_types::config::MentorConfig;

/// Live HTTP sessions keyed by id. Each session is driven one event at a time.
pub type SessionStore = DashMap<Uuid, Arc<Mutex<SessionState>>>;

/// Command-line overrides applied on top of `config.toml`.
#[derive(Debug, Default)]
pub struct ConfigOverrides {
    pub model: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl ConfigOverrides {
    fn apply(self, config: &mut MentorConfig) {
        if let Some(model) = self.model {
            config.model = model;
        }
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<SessionController>,
    pub sessions: Arc<SessionStore>,
    pub config: Arc<MentorConfig>,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Load config, resolve the API key and verify the default client builds.
    ///
    /// Every failure here is fatal: nothing is exposed without a usable client.
    pub async fn init(overrides: ConfigOverrides) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        ensure_data_dir(&data_dir)
            .await
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

        let mut config = load_config(&data_dir).await;
        overrides.apply(&mut config);

        let api_key = resolve_api_key(&EnvSecretProvider::new(), &config.api_key_env).await?;
        let factory = GeminiClientFactory::from_config(&config, api_key);

        let state = Self::from_factory(config, Arc::new(factory), data_dir);
        state
            .controller
            .cache()
            .get_or_build(&state.config.system_prompt)
            .await
            .context("failed to create model client")?;

        tracing::info!(
            model = %state.config.model,
            data_dir = %state.data_dir.display(),
            "Application state initialized"
        );
        Ok(state)
    }

    /// Wire the state around an already-built client factory.
    pub fn from_factory(
        config: MentorConfig,
        factory: Arc<dyn ClientFactory>,
        data_dir: PathBuf,
    ) -> Self {
        let settings = SessionSettings {
            default_system_prompt: config.system_prompt.clone(),
            greeting: config.greeting.clone(),
            reminder: ReminderPolicy::from_config(&config.reminder),
        };
        let cache = Arc::new(ClientCache::new(factory));

        Self {
            controller: Arc::new(SessionController::new(cache, settings)),
            sessions: Arc::new(DashMap::new()),
            config: Arc::new(config),
            data_dir,
        }
    }
}

/// Look up the API key, failing with a hint when it is absent.
pub async fn resolve_api_key(
    provider: &impl SecretProvider,
    key: &str,
) -> anyhow::Result<SecretString> {
    let value = provider.require(key).await.with_context(|| {
        format!("{key} not found. Export it or add `{key}=...` to a .env file")
    })?;
    Ok(SecretString::from(value))
}

/// Scripted model backend for handler and state tests.
#[cfg(test)]
pub(crate) mod test_support {
    use std::path::PathBuf;
    use std::sync::Arc;

    use mentorchat_core::chat::client::{ClientFactory, ModelClient, ModelSettings};
    use mentorchat_core::llm::box_provider::BoxLlmProvider;
    use mentorchat_core::llm::provider::LlmProvider;
    use mentorchat_types::config::MentorConfig;
    use mentorchat_types::error::ClientConstructionError;
    use mentorchat_types::llm::{
        CompletionRequest, CompletionResponse, LlmError, StopReason, Usage,
    };

    use super::AppState;

    /// Prompt text the factory refuses to build a client for.
    pub const BROKEN_PROMPT: &str = "BROKEN";

    /// Echoes the last user message; fails when it contains "FAIL".
    pub struct EchoProvider;

    impl LlmProvider for EchoProvider {
        fn name(&self) -> &str {
            "echo"
        }

        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            let last = request
                .messages
                .last()
                .map(|m| m.content.clone())
                .unwrap_or_default();
            if last.contains("FAIL") {
                return Err(LlmError::Overloaded("model busy".to_string()));
            }
            Ok(CompletionResponse {
                id: "resp-1".to_string(),
                content: format!("echo: {last}"),
                model: request.model.clone(),
                stop_reason: StopReason::EndTurn,
                usage: Usage::default(),
            })
        }
    }

    pub struct EchoFactory;

    impl ClientFactory for EchoFactory {
        fn build(&self, system_prompt: &str) -> Result<ModelClient, ClientConstructionError> {
            if system_prompt == BROKEN_PROMPT {
                return Err(ClientConstructionError::InvalidConfig(
                    "refused".to_string(),
                ));
            }
            ModelClient::new(
                BoxLlmProvider::new(EchoProvider),
                system_prompt,
                ModelSettings::default(),
            )
        }
    }

    pub fn test_state() -> AppState {
        let mut config = MentorConfig::default();
        config.system_prompt = "You are a mentor.".to_string();
        config.greeting = "Welcome!".to_string();
        config.reminder.text = "Stay calm".to_string();
        config.reminder.every = 2;
        AppState::from_factory(config, Arc::new(EchoFactory), PathBuf::from("/tmp/mentorchat-test"))
    }
}
