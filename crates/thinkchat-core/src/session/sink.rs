use crate::error::ChatError;

/// Outbound half of the chat runtime: delivers rendered text to the user.
#[async_trait::async_trait]
pub trait MessageSink: Send + Sync {
    async fn send(&self, content: &str) -> Result<(), ChatError>;
}
