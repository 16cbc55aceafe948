//! Configuration types for mentorchat.
//!
//! `MentorConfig` represents the `config.toml` in the data directory. Every
//! field has a default so an absent or partial file still yields a usable
//! configuration.

use serde::{Deserialize, Serialize};

/// Persona used when no system prompt is configured.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an experienced occupational therapist \
and clinical mentor. You support occupational therapists (students, new graduates and \
practising clinicians) as they reflect on cases, plan interventions, apply frameworks \
such as PEO, MOHO and CMOP-E, and grow their professional reasoning. Ask clarifying \
questions before giving advice, encourage reflective practice, stay within the scope of \
occupational therapy, never give a diagnosis for a real client, and remind the user to \
follow local policy and consult their supervisor when safety is involved. Keep a warm, \
encouraging and practical tone.";

/// Synthetic assistant message seeded into an empty transcript.
pub const DEFAULT_GREETING: &str = "Hi! I'm your occupational therapy mentor. \
What would you like to reflect on or work through today?";

/// Top-level configuration loaded from `~/.mentorchat/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentorConfig {
    /// Model identifier passed to the provider.
    #[serde(default = "default_model")]
    pub model: String,

    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Override for the provider base URL (proxies, testing).
    #[serde(default)]
    pub base_url: Option<String>,

    /// Initial system prompt for every new session.
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Assistant greeting seeded into a fresh transcript.
    #[serde(default = "default_greeting")]
    pub greeting: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Upper bound for a single remote call.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub reminder: ReminderConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_api_key_env() -> String {
    "GOOGLE_API_KEY".to_string()
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

fn default_greeting() -> String {
    DEFAULT_GREETING.to_string()
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_temperature() -> f64 {
    0.7
}

fn default_request_timeout_secs() -> u64 {
    60
}

impl Default for MentorConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key_env: default_api_key_env(),
            base_url: None,
            system_prompt: default_system_prompt(),
            greeting: default_greeting(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            request_timeout_secs: default_request_timeout_secs(),
            reminder: ReminderConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

/// Periodic reminder injected into outgoing user messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderConfig {
    /// Fixed reminder phrase. Takes precedence over `use_system_prompt`.
    #[serde(default)]
    pub text: String,

    /// Inject on every N-th user turn since the last reset.
    #[serde(default = "default_reminder_every")]
    pub every: u32,

    /// When `text` is empty, remind with the current system prompt.
    #[serde(default = "default_use_system_prompt")]
    pub use_system_prompt: bool,
}

fn default_reminder_every() -> u32 {
    3
}

fn default_use_system_prompt() -> bool {
    true
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            text: String::new(),
            every: default_reminder_every(),
            use_system_prompt: default_use_system_prompt(),
        }
    }
}

/// Bind address for `mentor serve`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = MentorConfig::default();
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.api_key_env, "GOOGLE_API_KEY");
        assert_eq!(config.reminder.every, 3);
        assert!(config.reminder.use_system_prompt);
        assert!(config.reminder.text.is_empty());
        assert_eq!(config.server.port, 3000);
        assert!(config.system_prompt.contains("occupational therap"));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let toml_str = r#"
model = "gemini-1.5-pro"

[reminder]
text = "Stay calm"
"#;
        let config: MentorConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.model, "gemini-1.5-pro");
        assert_eq!(config.reminder.text, "Stay calm");
        assert_eq!(config.reminder.every, 3);
        assert_eq!(config.request_timeout_secs, 60);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config: MentorConfig = toml::from_str("").unwrap();
        assert_eq!(config.greeting, DEFAULT_GREETING);
        assert_eq!(config.max_tokens, 2048);
    }
}
