pub mod error;
pub mod constants;
pub mod config;
pub mod llm;
pub mod context;
pub mod response;
pub mod session;

// Re-export key types
pub use error::ChatError;
pub use config::Settings;
pub use llm::{LlmClient, LlmResponse, Message, ModelInvoker, OllamaClient, Role, Usage};
pub use context::{ConversationMemory, PromptAssembler, PromptContext, Turn};
pub use response::ResponseProcessor;
pub use session::{MessageSink, SessionController, SessionId, SessionRegistry, TurnOutcome, TurnPhase};
