//! Interactive terminal chat for mentorchat.
//!
//! Welcome banner, markdown-rendered replies, a thinking spinner and slash
//! commands for changing the system prompt. Entry point:
//! `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod renderer;
