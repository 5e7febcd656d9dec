mod traits;
mod ollama;
mod invoker;

pub use traits::*;
pub use ollama::OllamaClient;
pub use invoker::ModelInvoker;
