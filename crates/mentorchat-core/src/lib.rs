//! Business logic and trait definitions for mentorchat.
//!
//! This crate defines the "ports" (provider, client factory and secret
//! provider traits) that the infrastructure layer implements, plus the
//! session controller that drives a conversation. It depends only on
//! `mentorchat-types` -- never on `mentorchat-infra` or any network crate.

pub mod chat;
pub mod llm;
pub mod repository;
