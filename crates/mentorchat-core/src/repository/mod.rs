//! Ports implemented by mentorchat-infra.

pub mod secret;
