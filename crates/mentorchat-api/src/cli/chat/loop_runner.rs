//! Main chat loop orchestration.
//!
//! Startup (client, greeting, banner), the input loop with slash commands,
//! and the full re-render after a system prompt change.

use std::time::{Duration, Instant};

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use mentorchat_core::chat::session::{SessionState, TurnOutcome};

use crate::state::AppState;

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::renderer::ChatRenderer;

fn thinking_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("thinking...");
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Banner followed by the whole transcript.
fn render_session(state: &AppState, session: &SessionState, renderer: &ChatRenderer) {
    print_welcome_banner(&state.config.model, session.system_prompt());
    renderer.print_transcript(session.log());
}

/// Run the interactive chat loop.
///
/// `initial_prompt` replaces the configured system prompt for this run.
/// Failing to build the first client is fatal; later failures are reported
/// and the loop continues.
pub async fn run_chat_loop(state: &AppState, initial_prompt: Option<String>) -> anyhow::Result<()> {
    let controller = &state.controller;
    let renderer = ChatRenderer::new();
    let mut session = controller.new_session();

    if let Some(prompt) = initial_prompt.as_deref() {
        controller.apply_system_prompt(&mut session, prompt)?;
    }
    controller.ensure_ready(&mut session).await?;

    render_session(state, &session, &renderer);

    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut chat_input, _writer) = ChatInput::new(prompt)
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    loop {
        let text = match chat_input.read_line().await {
            InputEvent::Eof => {
                println!("\n  {}", style("Session ended.").dim());
                break;
            }
            InputEvent::Interrupted => {
                println!("\n  {}", style("Press Ctrl+D to exit, or keep chatting.").dim());
                continue;
            }
            InputEvent::Message(text) if text.is_empty() => continue,
            InputEvent::Message(text) => text,
        };

        if let Some(cmd) = commands::parse(&text) {
            match cmd {
                ChatCommand::Help => commands::print_help(),
                ChatCommand::Clear => chat_input.clear(),
                ChatCommand::Exit => {
                    println!("\n  {}", style("Session ended.").dim());
                    break;
                }
                ChatCommand::System => {
                    println!();
                    println!("  {}", style("Current system prompt:").bold());
                    println!("{}", renderer.render(session.system_prompt()).trim_end());
                    println!();
                }
                ChatCommand::History => {
                    println!();
                    renderer.print_transcript(session.log());
                }
                ChatCommand::Prompt(new_prompt) => {
                    let change = match controller.apply_system_prompt(&mut session, &new_prompt) {
                        Ok(change) => change,
                        Err(e) => {
                            println!("\n  {} {e}\n", style("!").red().bold());
                            continue;
                        }
                    };
                    if !change.needs_rerender() {
                        renderer.print_notice("System prompt unchanged.");
                        continue;
                    }

                    let spinner = thinking_spinner();
                    let ready = controller.ensure_ready(&mut session).await;
                    spinner.finish_and_clear();
                    if let Err(e) = ready {
                        warn!(error = %e, "Could not prepare the new system prompt");
                        println!("\n  {} {e}\n", style("!").red().bold());
                        continue;
                    }

                    chat_input.clear();
                    render_session(state, &session, &renderer);
                }
                ChatCommand::Unknown(name) => {
                    println!(
                        "\n  {} Unknown command: {}. Type /help for available commands.\n",
                        style("?").yellow().bold(),
                        style(name).dim()
                    );
                }
            }
            continue;
        }

        let spinner = thinking_spinner();
        let start = Instant::now();
        let outcome = controller.submit_user_message(&mut session, &text).await;
        spinner.finish_and_clear();

        match outcome {
            Ok(TurnOutcome::Replied { reply, reminded }) => {
                info!(
                    turn = session.turn_count(),
                    reminded,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Reply received"
                );
                renderer.print_assistant(&reply);
            }
            Ok(TurnOutcome::Failed { notice, .. }) => {
                if let Some(record) = session.log().last() {
                    renderer.print_record(record);
                }
                renderer.print_notice(&notice);
                println!(
                    "  {}",
                    style("Type a message to retry, /exit to quit.").dim()
                );
            }
            Err(e) => {
                println!("\n  {} {e}\n", style("!").red().bold());
            }
        }
    }

    chat_input.flush();
    Ok(())
}
