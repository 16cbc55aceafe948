//! Conversation handling.
//!
//! - `client`: `ModelClient` / `ChatSession` handles and the `ClientFactory` port
//! - `cache`: construct-once-per-prompt client cache
//! - `reminder`: periodic reminder injection
//! - `session`: `SessionController` and per-session `SessionState`

pub mod cache;
pub mod client;
pub mod reminder;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;
