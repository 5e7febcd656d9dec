mod commands;
mod controller;
mod registry;
mod sink;
mod state;

pub use commands::{classify, Command, Input};
pub use controller::{SessionController, TurnOutcome};
pub use registry::SessionRegistry;
pub use sink::MessageSink;
pub use state::{SessionId, SessionState, TurnPhase};
