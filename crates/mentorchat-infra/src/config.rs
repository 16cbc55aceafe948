//! Configuration loader for mentorchat.
//!
//! Reads `config.toml` from the data directory (`~/.mentorchat/` in
//! production) and deserializes it into [`MentorConfig`]. Falls back to
//! defaults when the file is missing or malformed.

use std::path::Path;

use mentorchat_types::config::MentorConfig;

use crate::filesystem::config_path;

/// Load configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`MentorConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - Reminder frequency is clamped to at least 1.
pub async fn load_config(data_dir: &Path) -> MentorConfig {
    let config_path = config_path(data_dir);

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return MentorConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return MentorConfig::default();
        }
    };

    let mut config = match toml::from_str::<MentorConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            return MentorConfig::default();
        }
    };

    if config.reminder.every == 0 {
        tracing::warn!("reminder.every must be at least 1, using 1");
        config.reminder.every = 1;
    }
    config
}
