use crate::constants::defaults;
use crate::context::ConversationMemory;

pub type SessionId = uuid::Uuid;

/// Per-turn phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Idle,
    AwaitingModel,
}

/// Everything a session owns. Dropped with the session.
#[derive(Debug)]
pub struct SessionState {
    pub memory: ConversationMemory,
    pub clean_output: bool,
    pub phase: TurnPhase,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            memory: ConversationMemory::new(),
            clean_output: defaults::CLEAN_OUTPUT,
            phase: TurnPhase::Idle,
        }
    }

    pub fn with_clean_output(mut self, clean_output: bool) -> Self {
        self.clean_output = clean_output;
        self
    }

    /// Flip the clean-output preference, returning the new value.
    pub fn toggle_clean_output(&mut self) -> bool {
        self.clean_output = !self.clean_output;
        self.clean_output
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
