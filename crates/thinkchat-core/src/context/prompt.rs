use crate::context::memory::Turn;
use crate::context::system_prompt::DEFAULT_SYSTEM_INSTRUCTION;
use crate::llm::Message;

/// Everything one model call needs. Built per turn and dropped after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptContext {
    pub system_instruction: String,
    pub history: Vec<Turn>,
    pub question: String,
}

impl PromptContext {
    /// System message, then each past turn as a user/assistant pair, then the
    /// new question.
    pub fn to_messages(&self) -> Vec<Message> {
        let mut messages = Vec::with_capacity(self.history.len() * 2 + 2);
        messages.push(Message::system(&self.system_instruction));
        for turn in &self.history {
            messages.push(Message::user(turn.input()));
            messages.push(Message::assistant(turn.output()));
        }
        messages.push(Message::user(&self.question));
        messages
    }

    /// Plain-text rendering, logged at `debug` before each model call.
    pub fn render(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(&self.system_instruction);
        prompt.push_str("\n\n");

        if !self.history.is_empty() {
            prompt.push_str("## Conversation so far:\n\n");
            for turn in &self.history {
                prompt.push_str(&format!("Human: {}\nAI: {}\n\n", turn.input(), turn.output()));
            }
        }

        prompt.push_str(&format!("Human: {}\n", self.question));
        prompt
    }
}

/// Combines the system instruction, session history and new question.
///
/// With no window the whole history goes into every prompt, so prompt size
/// grows with the session. `with_history_window` caps it to the most recent
/// turns; memory itself is never trimmed.
#[derive(Debug, Clone)]
pub struct PromptAssembler {
    system_instruction: String,
    history_window: Option<usize>,
}

impl PromptAssembler {
    pub fn new() -> Self {
        Self {
            system_instruction: DEFAULT_SYSTEM_INSTRUCTION.to_string(),
            history_window: None,
        }
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = instruction.into();
        self
    }

    pub fn with_history_window(mut self, max_turns: Option<usize>) -> Self {
        self.history_window = max_turns;
        self
    }

    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    pub fn history_window(&self) -> Option<usize> {
        self.history_window
    }

    pub fn build(&self, history: &[Turn], question: impl Into<String>) -> PromptContext {
        let start = match self.history_window {
            Some(window) if history.len() > window => {
                tracing::debug!(
                    dropped = history.len() - window,
                    kept = window,
                    "History window applied"
                );
                history.len() - window
            }
            _ => 0,
        };

        PromptContext {
            system_instruction: self.system_instruction.clone(),
            history: history[start..].to_vec(),
            question: question.into(),
        }
    }
}

impl Default for PromptAssembler {
    fn default() -> Self {
        Self::new()
    }
}
