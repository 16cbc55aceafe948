//! Shared domain types for mentorchat.
//!
//! This crate contains the types used across the workspace: chat records and
//! the message log, LLM request/response shapes, configuration, and the error
//! enums for every failure tier.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
