//! Welcome banner display for chat sessions.

use console::style;

/// Longest prompt preview shown in the banner, in characters.
const PROMPT_PREVIEW_CHARS: usize = 96;

/// Shorten `prompt` to a single-line preview.
pub fn prompt_preview(prompt: &str) -> String {
    let flat = prompt.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= PROMPT_PREVIEW_CHARS {
        return flat;
    }
    let cut: String = flat.chars().take(PROMPT_PREVIEW_CHARS - 3).collect();
    format!("{cut}...")
}

/// Print the welcome banner showing the model and active system prompt.
pub fn print_welcome_banner(model: &str, system_prompt: &str) {
    println!();
    println!("  {} {}", "🩺", style("OT Mentor").cyan().bold());
    println!(
        "  {}",
        style("Reflect on cases, plan interventions, grow your clinical reasoning.").dim()
    );
    println!();
    println!("  {}   {}", style("Model:").bold(), style(model).dim());
    println!(
        "  {}  {}",
        style("Prompt:").bold(),
        style(prompt_preview(system_prompt)).dim()
    );
    println!();
    println!(
        "  {}",
        style("Type /help for commands, Ctrl+D to exit").dim()
    );
    println!("  {}", style("---").dim());
    println!();
}
