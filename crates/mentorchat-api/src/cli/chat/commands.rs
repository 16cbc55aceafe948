//! Slash command parsing for the chat loop.
//!
//! Commands start with `/` and control the session: changing the system
//! prompt, re-rendering the transcript, help and exit.

use console::style;

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Replace the system prompt (resets the conversation if it differs).
    Prompt(String),
    /// Show the active system prompt.
    System,
    /// Re-render the transcript.
    History,
    /// Clear the terminal screen.
    Clear,
    /// Exit the chat.
    Exit,
    /// Unknown command or missing argument.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let (cmd, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((cmd, arg)) => (cmd.to_lowercase(), arg.trim()),
        None => (trimmed.to_lowercase(), ""),
    };

    let command = match cmd.as_str() {
        "/help" | "/h" | "/?" => ChatCommand::Help,
        "/prompt" | "/p" => {
            if arg.is_empty() {
                ChatCommand::Unknown("/prompt requires the new system prompt".to_string())
            } else {
                ChatCommand::Prompt(arg.to_string())
            }
        }
        "/system" | "/sys" => ChatCommand::System,
        "/history" => ChatCommand::History,
        "/clear" | "/cls" => ChatCommand::Clear,
        "/exit" | "/quit" | "/q" => ChatCommand::Exit,
        other => ChatCommand::Unknown(other.to_string()),
    };
    Some(command)
}

/// Print the help text listing all available commands.
pub fn print_help() {
    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    println!("  {}          {}", style("/help").cyan(), "Show this help message");
    println!(
        "  {} {}",
        style("/prompt <text>").cyan(),
        "Set a new system prompt (starts a fresh conversation)"
    );
    println!("  {}        {}", style("/system").cyan(), "Show the current system prompt");
    println!("  {}       {}", style("/history").cyan(), "Show the conversation so far");
    println!("  {}         {}", style("/clear").cyan(), "Clear the screen");
    println!("  {}          {}", style("/exit").cyan(), "End the chat");
    println!();
    println!(
        "  {}",
        style("Ctrl+D to exit, Ctrl+C keeps the conversation").dim()
    );
    println!();
}
