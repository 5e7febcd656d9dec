use serde::{Deserialize, Serialize};

/// One input/output exchange. Immutable once committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    input: String,
    output: String,
}

impl Turn {
    pub fn new(input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn output(&self) -> &str {
        &self.output
    }
}

/// Append-only log of the turns of a single session, in commit order.
///
/// There is no eviction: the log only grows until the owning session is
/// dropped. Prompt-side windowing lives in `PromptAssembler`.
#[derive(Debug, Clone, Default)]
pub struct ConversationMemory {
    turns: Vec<Turn>,
}

impl ConversationMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Every committed turn, oldest first. Reading has no side effects.
    pub fn history(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last_turn(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn estimate_tokens(&self) -> usize {
        self.turns
            .iter()
            .map(|t| (t.input.len() + t.output.len()) / 4)
            .sum()
    }
}
