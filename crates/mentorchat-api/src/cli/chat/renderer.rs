//! Terminal markdown rendering for the transcript.
//!
//! Model replies are markdown; `termimad` renders them with a dark skin.
//! Error records are shown in red instead of being parsed as markdown.

use console::style;
use termimad::MadSkin;
use termimad::crossterm::style::Color;

use mentorchat_types::chat::{ChatRecord, MessageLog, MessageRole};

/// Prefix identifying error records in the transcript.
const ERROR_PREFIX: &str = "⚠️";

/// Terminal markdown renderer.
pub struct ChatRenderer {
    skin: MadSkin,
}

impl ChatRenderer {
    pub fn new() -> Self {
        let mut skin = MadSkin::default_dark();
        skin.bold.set_fg(Color::Cyan);
        skin.headers[0].set_fg(Color::Cyan);
        skin.headers[1].set_fg(Color::Cyan);
        skin.inline_code.set_fg(Color::Yellow);
        Self { skin }
    }

    /// Render markdown to a terminal string.
    pub fn render(&self, markdown: &str) -> String {
        self.skin.term_text(markdown).to_string()
    }

    /// Print an assistant reply.
    pub fn print_assistant(&self, content: &str) {
        if content.starts_with(ERROR_PREFIX) {
            println!("\n  {}\n", style(content).red());
            return;
        }
        println!("\n  {} ", style("Mentor >").cyan().bold());
        println!("{}", self.render(content).trim_end());
        println!();
    }

    /// Print a user message as it appears in the transcript.
    pub fn print_user(&self, content: &str) {
        println!("  {} {}", style("You >").green().bold(), content);
    }

    pub fn print_record(&self, record: &ChatRecord) {
        match record.role {
            MessageRole::User => self.print_user(&record.content),
            MessageRole::Assistant | MessageRole::System => self.print_assistant(&record.content),
        }
    }

    /// Print the whole transcript in order.
    pub fn print_transcript(&self, log: &MessageLog) {
        for record in log.iter() {
            self.print_record(record);
        }
    }

    /// Print a transient notice (dimmed).
    pub fn print_notice(&self, notice: &str) {
        println!("  {}", style(notice).dim());
    }
}

impl Default for ChatRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_keeps_text() {
        let renderer = ChatRenderer::new();
        let out = renderer.render("Use the **PEO** model");
        assert!(out.contains("PEO"));
        assert!(out.contains("model"));
    }
}
