use thiserror::Error;

/// Errors raised while building a model client for a system prompt.
///
/// Fatal for the current render cycle: nothing can be sent until the
/// configuration problem is fixed.
#[derive(Debug, Error)]
pub enum ClientConstructionError {
    #[error("system prompt must not be empty")]
    EmptySystemPrompt,

    #[error("model identifier must not be empty")]
    EmptyModel,

    #[error("invalid provider configuration: {0}")]
    InvalidConfig(String),
}

/// Errors from session controller operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("system prompt must not be empty")]
    EmptyPrompt,

    #[error("message must not be empty")]
    EmptyMessage,

    #[error("failed to create model client: {0}")]
    ClientConstruction(#[from] ClientConstructionError),
}

/// Errors resolving the API credential at startup.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("environment variable {0} is not set")]
    Missing(String),
}
