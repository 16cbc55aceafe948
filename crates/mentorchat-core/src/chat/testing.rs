//! Scripted provider and factory for controller tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use mentorchat_types::error::ClientConstructionError;
use mentorchat_types::llm::{CompletionRequest, CompletionResponse, LlmError, StopReason, Usage};

use super::client::{ClientFactory, ModelClient, ModelSettings};
use crate::llm::box_provider::BoxLlmProvider;
use crate::llm::provider::LlmProvider;

/// Shared state behind every `ScriptedProvider` built from it.
#[derive(Default)]
pub struct Script {
    requests: Mutex<Vec<CompletionRequest>>,
    failures: Mutex<Vec<String>>,
    delay: Mutex<Option<Duration>>,
}

impl Script {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make the next call fail with a provider error carrying `message`.
    pub fn fail_next(&self, message: &str) {
        self.failures.lock().unwrap().push(message.to_string());
    }

    pub fn delay_replies(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Text of the last user message of every request, in call order.
    pub fn sent_texts(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter_map(|r| r.messages.last().map(|m| m.content.clone()))
            .collect()
    }
}

/// Replies "reply N" for the Nth call, or fails when scripted to.
pub struct ScriptedProvider {
    script: Arc<Script>,
}

impl ScriptedProvider {
    pub fn new(script: Arc<Script>) -> Self {
        Self { script }
    }
}

impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let delay = *self.script.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let call = {
            let mut requests = self.script.requests.lock().unwrap();
            requests.push(request.clone());
            requests.len()
        };

        if let Some(message) = self.script.failures.lock().unwrap().pop() {
            return Err(LlmError::Provider { message });
        }

        Ok(CompletionResponse {
            id: format!("resp-{call}"),
            content: format!("reply {call}"),
            model: request.model.clone(),
            stop_reason: StopReason::EndTurn,
            usage: Usage {
                input_tokens: 10,
                output_tokens: 5,
            },
        })
    }
}

/// Factory that counts builds and can be told to refuse them.
pub struct CountingFactory {
    pub script: Arc<Script>,
    builds: AtomicUsize,
    refuse: Mutex<bool>,
}

impl CountingFactory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            script: Script::new(),
            builds: AtomicUsize::new(0),
            refuse: Mutex::new(false),
        })
    }

    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }

    pub fn set_refuse(&self, refuse: bool) {
        *self.refuse.lock().unwrap() = refuse;
    }
}

impl ClientFactory for CountingFactory {
    fn build(&self, system_prompt: &str) -> Result<ModelClient, ClientConstructionError> {
        if *self.refuse.lock().unwrap() {
            return Err(ClientConstructionError::InvalidConfig(
                "factory refused".to_string(),
            ));
        }
        self.builds.fetch_add(1, Ordering::SeqCst);
        ModelClient::new(
            BoxLlmProvider::new(ScriptedProvider::new(self.script.clone())),
            system_prompt,
            ModelSettings::default(),
        )
    }
}
