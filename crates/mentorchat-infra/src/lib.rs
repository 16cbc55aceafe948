//! Infrastructure layer for mentorchat.
//!
//! Contains implementations of the ports defined in `mentorchat-core`: the
//! Gemini LLM provider and its client factory, the environment secret
//! provider, plus the config file loader and data directory resolution.

pub mod config;
pub mod filesystem;
pub mod llm;
pub mod secret;
