//! Secret provider implementations.
//!
//! - `env`: Environment variable provider (read-only)

pub mod env;
