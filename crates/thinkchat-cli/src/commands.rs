/// Result of checking a line against the terminal's own commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Leave the chat.
    Quit,
    /// Not a terminal command - forward to the session.
    NotACommand,
}

/// Terminal-level commands. Everything else, `/toggle_thoughts` included,
/// belongs to the session.
pub fn handle_command(input: &str) -> CommandResult {
    match input.trim().to_ascii_lowercase().as_str() {
        "/exit" | "/quit" | "/q" => CommandResult::Quit,
        _ => CommandResult::NotACommand,
    }
}
