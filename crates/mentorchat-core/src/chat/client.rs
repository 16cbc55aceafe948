//! Model client and chat session handles.
//!
//! A `ModelClient` binds a provider to one system prompt and one model. A
//! `ChatSession` started from it carries the conversation transcript that is
//! replayed on every request, since the remote API itself is stateless.

use std::sync::Arc;
use std::time::Duration;

use tracing::field::Empty;
use tracing::{Instrument, debug, info_span};

use mentorchat_types::error::ClientConstructionError;
use mentorchat_types::llm::{CompletionRequest, CompletionResponse, LlmError, Message};

use crate::llm::box_provider::BoxLlmProvider;

/// Generation parameters shared by every client a factory builds.
#[derive(Debug, Clone)]
pub struct ModelSettings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: Option<f64>,
    pub request_timeout: Duration,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            model: "gemini-2.0-flash".to_string(),
            max_tokens: 2048,
            temperature: Some(0.7),
            request_timeout: Duration::from_secs(60),
        }
    }
}

/// Builds model clients for a given system prompt.
///
/// Implemented in mentorchat-infra for the real provider. The
/// [`ClientCache`](super::cache::ClientCache) calls this at most once per
/// distinct prompt text.
pub trait ClientFactory: Send + Sync {
    fn build(&self, system_prompt: &str) -> Result<ModelClient, ClientConstructionError>;
}

/// A provider bound to one system prompt.
///
/// Does not derive Debug: the provider may hold credentials.
pub struct ModelClient {
    provider: BoxLlmProvider,
    system_prompt: String,
    settings: ModelSettings,
}

impl ModelClient {
    /// Bind `provider` to `system_prompt`.
    ///
    /// Rejects an empty prompt or model identifier.
    pub fn new(
        provider: BoxLlmProvider,
        system_prompt: impl Into<String>,
        settings: ModelSettings,
    ) -> Result<Self, ClientConstructionError> {
        let system_prompt = system_prompt.into();
        if system_prompt.trim().is_empty() {
            return Err(ClientConstructionError::EmptySystemPrompt);
        }
        if settings.model.trim().is_empty() {
            return Err(ClientConstructionError::EmptyModel);
        }
        Ok(Self {
            provider,
            system_prompt,
            settings,
        })
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Start a conversation with an empty history.
    pub fn start_session(self: &Arc<Self>) -> ChatSession {
        ChatSession {
            client: Arc::clone(self),
            history: Vec::new(),
        }
    }
}

/// A live conversation on a [`ModelClient`].
pub struct ChatSession {
    client: Arc<ModelClient>,
    history: Vec<Message>,
}

impl ChatSession {
    /// Send `text` as the next user turn and wait for the reply.
    ///
    /// The exchange is only added to the history when the call succeeds, so a
    /// failed turn is never replayed to the model.
    pub async fn send(&mut self, text: &str) -> Result<CompletionResponse, LlmError> {
        let mut messages = self.history.clone();
        messages.push(Message::user(text));

        let settings = &self.client.settings;
        let request = CompletionRequest {
            model: settings.model.clone(),
            messages,
            system: Some(self.client.system_prompt.clone()),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
        };

        debug!(
            provider = self.client.provider_name(),
            history = self.history.len(),
            "Sending chat turn"
        );

        // Response fields are recorded by the provider once the call returns.
        let span = info_span!(
            "gen_ai.chat",
            gen_ai.operation.name = "chat",
            gen_ai.system = self.client.provider_name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.max_tokens = request.max_tokens,
            gen_ai.request.temperature = ?request.temperature,
            gen_ai.response.id = Empty,
            gen_ai.response.finish_reasons = Empty,
            gen_ai.usage.input_tokens = Empty,
            gen_ai.usage.output_tokens = Empty,
        );

        let response = tokio::time::timeout(
            settings.request_timeout,
            self.client.provider.complete(&request),
        )
        .instrument(span)
        .await
        .map_err(|_| LlmError::Timeout {
            secs: settings.request_timeout.as_secs(),
        })??;

        self.history.push(Message::user(text));
        self.history.push(Message::assistant(response.content.clone()));
        Ok(response)
    }

    /// Messages exchanged so far, in order.
    pub fn history(&self) -> &[Message] {
        &self.history
    }
}
