use crate::constants::commands;

/// In-band control commands understood by a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Flip between hiding and showing `<think>` blocks.
    ToggleThoughts,
}

/// How a raw incoming message is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input<'a> {
    /// Empty or whitespace only.
    Empty,
    Command(Command),
    /// Anything else goes to the model, unmodified.
    Query(&'a str),
}

pub fn classify(input: &str) -> Input<'_> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Input::Empty;
    }
    if trimmed.eq_ignore_ascii_case(commands::TOGGLE_THOUGHTS) {
        return Input::Command(Command::ToggleThoughts);
    }
    Input::Query(input)
}
