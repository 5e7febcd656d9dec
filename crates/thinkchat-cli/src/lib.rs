// Library interface for thinkchat-cli
// This allows integration tests to access internal modules

#[path = "commands.rs"]
pub mod commands;

#[path = "app.rs"]
pub mod app;

// Re-export commonly used items for easier testing
pub use app::{answer_once, ConsoleSink};
pub use commands::{handle_command, CommandResult};
