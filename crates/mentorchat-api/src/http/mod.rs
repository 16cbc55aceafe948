//! HTTP/REST API layer for mentorchat.
//!
//! Axum-based REST API at `/api/v1/` with the envelope response format and
//! CORS support. Each session is an independent conversation.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
