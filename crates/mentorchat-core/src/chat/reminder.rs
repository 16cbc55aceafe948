//! Periodic reminder injection.
//!
//! Every N-th user turn the outgoing text is prefixed with a reminder so the
//! model keeps to its role in long conversations. The transcript shown to the
//! user always keeps the original text.

use mentorchat_types::config::ReminderConfig;

/// When and what to remind the model of.
#[derive(Debug, Clone)]
pub struct ReminderPolicy {
    text: String,
    every: u32,
    use_system_prompt: bool,
}

impl ReminderPolicy {
    /// `every` is clamped to at least 1.
    pub fn new(text: impl Into<String>, every: u32, use_system_prompt: bool) -> Self {
        Self {
            text: text.into(),
            every: every.max(1),
            use_system_prompt,
        }
    }

    /// A policy that never injects anything.
    pub fn disabled() -> Self {
        Self::new(String::new(), 1, false)
    }

    pub fn from_config(config: &ReminderConfig) -> Self {
        Self::new(config.text.clone(), config.every, config.use_system_prompt)
    }

    pub fn every(&self) -> u32 {
        self.every
    }

    /// The reminder string in effect for `system_prompt`, if any.
    ///
    /// The fixed text wins; otherwise the system prompt itself when enabled.
    /// Blank strings count as "not configured".
    pub fn reminder_for<'a>(&'a self, system_prompt: &'a str) -> Option<&'a str> {
        if !self.text.trim().is_empty() {
            return Some(&self.text);
        }
        if self.use_system_prompt && !system_prompt.trim().is_empty() {
            return Some(system_prompt);
        }
        None
    }

    /// Whether turn number `turn` (1-based) is a reminder turn.
    pub fn is_due(&self, turn: u32) -> bool {
        turn > 0 && turn % self.every == 0
    }

    /// Text to send for user turn `turn`, and whether a reminder was injected.
    pub fn outgoing(&self, turn: u32, system_prompt: &str, text: &str) -> (String, bool) {
        match self.reminder_for(system_prompt) {
            Some(reminder) if self.is_due(turn) => (compose(reminder, text), true),
            _ => (text.to_string(), false),
        }
    }
}

/// Prefix `text` with `reminder`, keeping both verbatim.
pub fn compose(reminder: &str, text: &str) -> String {
    format!("(Reminder: {reminder})\n\n{text}")
}
