//! Session controller.
//!
//! Owns the lifecycle of one conversation: which system prompt is active,
//! the live [`ChatSession`], the rendered transcript and the turn counter.
//! The presentation layers (terminal loop, HTTP handlers) call into it one
//! event at a time and re-render from [`SessionState::log`].

use std::sync::Arc;

use tracing::{debug, info, warn};

use mentorchat_types::chat::MessageLog;
use mentorchat_types::error::SessionError;

use super::cache::ClientCache;
use super::client::ChatSession;
use super::reminder::ReminderPolicy;

/// Result of applying a system prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptChange {
    /// The prompt changed and the session was reset. Re-render everything.
    Replaced,
    /// Same prompt as before; nothing happened.
    Unchanged,
}

impl PromptChange {
    pub fn needs_rerender(self) -> bool {
        matches!(self, PromptChange::Replaced)
    }
}

/// Result of one user turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    Replied { reply: String, reminded: bool },
    /// The remote call failed. An error record was added to the log and
    /// `notice` is meant for a transient banner.
    Failed { notice: String, reminded: bool },
}

impl TurnOutcome {
    pub fn reminded(&self) -> bool {
        match self {
            TurnOutcome::Replied { reminded, .. } | TurnOutcome::Failed { reminded, .. } => {
                *reminded
            }
        }
    }
}

/// Immutable per-process settings shared by every session.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub default_system_prompt: String,
    pub greeting: String,
    pub reminder: ReminderPolicy,
}

/// Per-session mutable state.
pub struct SessionState {
    system_prompt: String,
    chat: Option<ChatSession>,
    log: MessageLog,
    turn_count: u32,
}

impl SessionState {
    /// The prompt is stored trimmed, the same form `apply_system_prompt`
    /// compares against.
    pub fn new(system_prompt: &str) -> Self {
        Self {
            system_prompt: system_prompt.trim().to_string(),
            chat: None,
            log: MessageLog::new(),
            turn_count: 0,
        }
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    /// User turns since the last reset.
    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn has_chat_session(&self) -> bool {
        self.chat.is_some()
    }

    fn reset_for_prompt(&mut self, system_prompt: String) {
        self.system_prompt = system_prompt;
        self.chat = None;
        self.log.clear();
        self.turn_count = 0;
    }
}

/// Drives conversations against a shared [`ClientCache`].
pub struct SessionController {
    cache: Arc<ClientCache>,
    settings: SessionSettings,
}

impl SessionController {
    pub fn new(cache: Arc<ClientCache>, settings: SessionSettings) -> Self {
        Self { cache, settings }
    }

    pub fn cache(&self) -> &Arc<ClientCache> {
        &self.cache
    }

    /// Fresh state using the default system prompt.
    pub fn new_session(&self) -> SessionState {
        SessionState::new(&self.settings.default_system_prompt)
    }

    /// Switch the session to `new_prompt`.
    ///
    /// The prompt is trimmed before comparison. A different prompt resets the
    /// transcript, the chat session and the turn counter.
    pub fn apply_system_prompt(
        &self,
        state: &mut SessionState,
        new_prompt: &str,
    ) -> Result<PromptChange, SessionError> {
        let new_prompt = new_prompt.trim();
        if new_prompt.is_empty() {
            return Err(SessionError::EmptyPrompt);
        }
        if new_prompt == state.system_prompt {
            debug!("System prompt unchanged");
            return Ok(PromptChange::Unchanged);
        }

        info!(
            dropped_records = state.log.len(),
            prompt_len = new_prompt.len(),
            "System prompt replaced, session reset"
        );
        state.reset_for_prompt(new_prompt.to_string());
        Ok(PromptChange::Replaced)
    }

    /// Make sure the session has a client and a live chat session.
    ///
    /// Seeds the greeting into an empty transcript. Safe to call repeatedly.
    pub async fn ensure_ready(&self, state: &mut SessionState) -> Result<(), SessionError> {
        self.ready_chat(&mut state.chat, &mut state.log, &state.system_prompt)
            .await?;
        Ok(())
    }

    async fn ready_chat<'a>(
        &self,
        chat: &'a mut Option<ChatSession>,
        log: &mut MessageLog,
        system_prompt: &str,
    ) -> Result<&'a mut ChatSession, SessionError> {
        let client = self.cache.get_or_build(system_prompt).await?;

        if chat.is_none() {
            debug!(model = client.model(), "Starting chat session");
            if log.is_empty() {
                log.push_assistant(self.settings.greeting.clone());
            }
        }
        Ok(chat.get_or_insert_with(|| client.start_session()))
    }

    /// Send one user message and record the exchange.
    ///
    /// The transcript always grows by exactly two records: the user text and
    /// either the reply or an error record. Remote failures come back as
    /// [`TurnOutcome::Failed`], never as `Err`.
    pub async fn submit_user_message(
        &self,
        state: &mut SessionState,
        text: &str,
    ) -> Result<TurnOutcome, SessionError> {
        if text.trim().is_empty() {
            return Err(SessionError::EmptyMessage);
        }
        let chat = self
            .ready_chat(&mut state.chat, &mut state.log, &state.system_prompt)
            .await?;

        state.turn_count += 1;
        state.log.push_user(text);

        let (outgoing, reminded) =
            self.settings
                .reminder
                .outgoing(state.turn_count, &state.system_prompt, text);
        if reminded {
            debug!(turn = state.turn_count, "Injecting reminder");
        }

        match chat.send(&outgoing).await {
            Ok(response) => {
                info!(
                    turn = state.turn_count,
                    reminded,
                    input_tokens = response.usage.input_tokens,
                    output_tokens = response.usage.output_tokens,
                    "Chat turn completed"
                );
                state.log.push_assistant(response.content.clone());
                Ok(TurnOutcome::Replied {
                    reply: response.content,
                    reminded,
                })
            }
            Err(e) => {
                warn!(turn = state.turn_count, error = %e, "Chat turn failed");
                state.log.push_assistant(format!("⚠️ Error: {e}"));
                Ok(TurnOutcome::Failed {
                    notice: format!("The mentor could not answer: {e}"),
                    reminded,
                })
            }
        }
    }
}
