use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::Settings;
use crate::constants::messages;
use crate::context::{PromptAssembler, Turn};
use crate::error::{ChatError, Result};
use crate::llm::{LlmClient, ModelInvoker};
use crate::response::ResponseProcessor;
use crate::session::commands::{classify, Command, Input};
use crate::session::sink::MessageSink;
use crate::session::state::{SessionId, SessionState, TurnPhase};

/// What one incoming message resulted in.
#[derive(Debug)]
pub enum TurnOutcome {
    /// Empty input; the user was asked to type something.
    EmptyInput,
    /// `/toggle_thoughts` was applied. Carries the new preference.
    ThoughtsToggled { clean_output: bool },
    /// The model answered; `text` was displayed and stored.
    Answered { text: String },
    /// The model call failed; the user got the generic apology.
    Failed { error: ChatError },
}

/// Drives one session: classifies each message, runs model turns and keeps
/// the session's memory and clean-output preference.
///
/// Model turns are serialized through `turn_gate`. Commands and empty-input
/// notices never wait on it, so a toggle sent while a turn is in flight is
/// applied immediately and takes effect from the next turn.
pub struct SessionController {
    id: SessionId,
    assembler: PromptAssembler,
    invoker: ModelInvoker,
    processor: ResponseProcessor,
    state: Mutex<SessionState>,
    turn_gate: tokio::sync::Mutex<()>,
}

impl SessionController {
    pub fn new(id: SessionId, assembler: PromptAssembler, invoker: ModelInvoker) -> Self {
        Self {
            id,
            assembler,
            invoker,
            processor: ResponseProcessor::new(),
            state: Mutex::new(SessionState::new()),
            turn_gate: tokio::sync::Mutex::new(()),
        }
    }

    pub fn from_settings(id: SessionId, settings: &Settings, client: Arc<dyn LlmClient>) -> Self {
        let invoker = ModelInvoker::new(client).with_timeout(settings.invocation_timeout());
        Self::new(id, settings.build_assembler(), invoker)
            .with_clean_output(settings.chat.clean_output_by_default)
    }

    /// Builder for a fresh session; replaces its state wholesale.
    pub fn with_clean_output(self, clean_output: bool) -> Self {
        Self {
            state: Mutex::new(SessionState::new().with_clean_output(clean_output)),
            ..self
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn clean_output(&self) -> bool {
        self.lock_state().clean_output
    }

    pub fn phase(&self) -> TurnPhase {
        self.lock_state().phase
    }

    /// Snapshot of the committed turns, oldest first.
    pub fn history(&self) -> Vec<Turn> {
        self.lock_state().memory.history().to_vec()
    }

    pub fn memory_len(&self) -> usize {
        self.lock_state().memory.len()
    }

    /// Session start: greet the user and list the available commands.
    pub async fn start(&self, sink: &dyn MessageSink) {
        tracing::info!(session = %self.id, model = self.invoker.model(), "Session started");
        deliver(sink, messages::WELCOME).await;
    }

    pub async fn handle_message(&self, text: &str, sink: &dyn MessageSink) -> TurnOutcome {
        match classify(text) {
            Input::Empty => {
                deliver(sink, messages::EMPTY_INPUT).await;
                TurnOutcome::EmptyInput
            }
            Input::Command(Command::ToggleThoughts) => {
                let clean_output = self.lock_state().toggle_clean_output();
                tracing::info!(session = %self.id, clean_output, "Thought visibility toggled");
                deliver(sink, &messages::thoughts_toggled(clean_output)).await;
                TurnOutcome::ThoughtsToggled { clean_output }
            }
            Input::Query(question) => match self.run_turn(question).await {
                Ok(text) => {
                    deliver(sink, &text).await;
                    TurnOutcome::Answered { text }
                }
                Err(error) => {
                    tracing::error!(session = %self.id, "Error processing message: {}", error);
                    deliver(sink, messages::INVOCATION_FAILED).await;
                    TurnOutcome::Failed { error }
                }
            },
        }
    }

    async fn run_turn(&self, question: &str) -> Result<String> {
        let _turn = self.turn_gate.lock().await;
        tracing::info!(session = %self.id, "Processing message: {}", question);

        // The preference is read once here; later toggles apply to the next turn.
        let (prompt, clean_output) = {
            let mut state = self.lock_state();
            state.phase = TurnPhase::AwaitingModel;
            tracing::debug!(
                session = %self.id,
                turns = state.memory.len(),
                estimated_tokens = state.memory.estimate_tokens(),
                "Assembling prompt"
            );
            (
                self.assembler.build(state.memory.history(), question),
                state.clean_output,
            )
        };
        let _idle = IdleOnDrop(self);

        let raw = self.invoker.invoke(&prompt).await?;
        if clean_output && self.processor.has_reasoning(&raw) {
            tracing::debug!(session = %self.id, "Stripping reasoning block");
        }
        let text = self.processor.process(&raw, clean_output);

        self.lock_state()
            .memory
            .append(Turn::new(question, text.clone()));
        tracing::info!(session = %self.id, "Generated response: {}", text);
        Ok(text)
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Puts the session back to `Idle` however the turn ends, including when the
/// turn future is dropped mid-call.
struct IdleOnDrop<'a>(&'a SessionController);

impl Drop for IdleOnDrop<'_> {
    fn drop(&mut self) {
        self.0.lock_state().phase = TurnPhase::Idle;
    }
}

async fn deliver(sink: &dyn MessageSink, content: &str) {
    if let Err(e) = sink.send(content).await {
        tracing::warn!("Failed to deliver message: {}", e);
    }
}
