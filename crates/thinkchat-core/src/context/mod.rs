mod memory;
mod prompt;
pub mod system_prompt;

pub use memory::{ConversationMemory, Turn};
pub use prompt::{PromptAssembler, PromptContext};
pub use system_prompt::{system_instruction, DEFAULT_SYSTEM_INSTRUCTION};
