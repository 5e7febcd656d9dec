use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::Settings;
use crate::error::{ChatError, Result};
use crate::llm::LlmClient;
use crate::session::controller::SessionController;
use crate::session::sink::MessageSink;
use crate::session::state::SessionId;

/// Live sessions, keyed by id. Owned by the chat runtime: sessions are
/// created when a user connects and dropped, memory included, when they leave.
pub struct SessionRegistry {
    settings: Settings,
    client: Arc<dyn LlmClient>,
    sessions: RwLock<HashMap<SessionId, Arc<SessionController>>>,
}

impl SessionRegistry {
    pub fn new(settings: Settings) -> Self {
        let client = settings.build_llm_client();
        Self::with_client(settings, client)
    }

    /// Use a specific model client instead of the one `settings` describes.
    pub fn with_client(settings: Settings, client: Arc<dyn LlmClient>) -> Self {
        Self {
            settings,
            client,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Create a session, register it and send the welcome message.
    pub async fn start_session(&self, sink: &dyn MessageSink) -> Arc<SessionController> {
        let id = SessionId::new_v4();
        let controller = Arc::new(SessionController::from_settings(
            id,
            &self.settings,
            self.client.clone(),
        ));
        self.sessions.write().await.insert(id, controller.clone());
        controller.start(sink).await;
        controller
    }

    pub async fn get(&self, id: &SessionId) -> Option<Arc<SessionController>> {
        self.sessions.read().await.get(id).cloned()
    }

    pub async fn end_session(&self, id: &SessionId) -> Result<()> {
        let removed = self.sessions.write().await.remove(id);
        match removed {
            Some(controller) => {
                tracing::info!(
                    session = %id,
                    turns = controller.memory_len(),
                    "Session ended"
                );
                Ok(())
            }
            None => Err(ChatError::SessionNotFound(id.to_string())),
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    pub async fn session_ids(&self) -> Vec<SessionId> {
        self.sessions.read().await.keys().copied().collect()
    }
}
