use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use thinkchat_core::constants::messages;
use thinkchat_core::{
    ChatError, LlmClient, LlmResponse, Message, MessageSink, ModelInvoker, PromptAssembler,
    SessionController, SessionId, SessionRegistry, Settings, Turn, TurnOutcome, TurnPhase,
};
use tokio::sync::Notify;

/// Mock LLM that replays scripted replies and records every request.
struct MockLlm {
    replies: Mutex<VecDeque<Result<String, String>>>,
    calls: Mutex<Vec<Vec<Message>>>,
}

impl MockLlm {
    fn new(replies: Vec<Result<&str, &str>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(
                replies
                    .into_iter()
                    .map(|r| r.map(str::to_string).map_err(str::to_string))
                    .collect(),
            ),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<Vec<Message>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl LlmClient for MockLlm {
    async fn chat(&self, messages: &[Message]) -> Result<LlmResponse, ChatError> {
        self.calls.lock().unwrap().push(messages.to_vec());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("Mock response".to_string()));
        match reply {
            Ok(text) => Ok(LlmResponse {
                message: Message::assistant(text),
                usage: None,
            }),
            Err(e) => Err(ChatError::Llm(e)),
        }
    }

    fn model(&self) -> &str {
        "mock"
    }
}

/// Blocks inside `chat` until released, to hold a turn in flight.
struct GatedLlm {
    started: Arc<Notify>,
    release: Arc<Notify>,
    reply: String,
}

#[async_trait::async_trait]
impl LlmClient for GatedLlm {
    async fn chat(&self, _messages: &[Message]) -> Result<LlmResponse, ChatError> {
        self.started.notify_one();
        self.release.notified().await;
        Ok(LlmResponse {
            message: Message::assistant(self.reply.clone()),
            usage: None,
        })
    }

    fn model(&self) -> &str {
        "gated"
    }
}

/// Never answers within any sane timeout.
struct SlowLlm;

#[async_trait::async_trait]
impl LlmClient for SlowLlm {
    async fn chat(&self, _messages: &[Message]) -> Result<LlmResponse, ChatError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(LlmResponse {
            message: Message::assistant("too late"),
            usage: None,
        })
    }

    fn model(&self) -> &str {
        "slow"
    }
}

#[derive(Default)]
struct RecordingSink {
    sent: Mutex<Vec<String>>,
}

impl RecordingSink {
    fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    fn last(&self) -> String {
        self.sent().last().cloned().unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl MessageSink for RecordingSink {
    async fn send(&self, content: &str) -> Result<(), ChatError> {
        self.sent.lock().unwrap().push(content.to_string());
        Ok(())
    }
}

fn controller_with(llm: Arc<dyn LlmClient>) -> SessionController {
    SessionController::new(SessionId::new_v4(), PromptAssembler::new(), ModelInvoker::new(llm))
}

// ========================================================================
// Session start
// ========================================================================

#[tokio::test]
async fn test_new_session_defaults() {
    let session = controller_with(MockLlm::new(vec![]));

    assert!(session.clean_output());
    assert_eq!(session.phase(), TurnPhase::Idle);
    assert_eq!(session.memory_len(), 0);
}

#[tokio::test]
async fn test_with_clean_output_starts_session_in_raw_mode() {
    let llm = MockLlm::new(vec![Ok("<think>r</think>A")]);
    let session = controller_with(llm).with_clean_output(false);
    let sink = RecordingSink::default();

    assert!(!session.clean_output());
    assert_eq!(session.phase(), TurnPhase::Idle);
    assert_eq!(session.memory_len(), 0);

    session.handle_message("q", &sink).await;
    assert_eq!(sink.last(), "<think>r</think>A");
}

#[tokio::test]
async fn test_start_sends_welcome_listing_commands() {
    let session = controller_with(MockLlm::new(vec![]));
    let sink = RecordingSink::default();

    session.start(&sink).await;

    assert_eq!(sink.sent(), vec![messages::WELCOME.to_string()]);
    assert!(sink.last().contains("/toggle_thoughts"));
}

// ========================================================================
// Empty input
// ========================================================================

#[tokio::test]
async fn test_empty_input_never_touches_memory_or_model() {
    let llm = MockLlm::new(vec![]);
    let session = controller_with(llm.clone());
    let sink = RecordingSink::default();

    for text in ["", " ", "\n\t", "   \r\n  "] {
        let outcome = session.handle_message(text, &sink).await;
        assert!(matches!(outcome, TurnOutcome::EmptyInput));
        assert_eq!(sink.last(), messages::EMPTY_INPUT);
    }

    assert_eq!(session.memory_len(), 0);
    assert!(llm.calls().is_empty());
}

// ========================================================================
// /toggle_thoughts
// ========================================================================

#[tokio::test]
async fn test_toggle_parity() {
    let llm = MockLlm::new(vec![]);
    let session = controller_with(llm.clone());
    let sink = RecordingSink::default();

    let outcome = session.handle_message("/toggle_thoughts", &sink).await;
    assert!(matches!(outcome, TurnOutcome::ThoughtsToggled { clean_output: false }));
    assert_eq!(sink.last(), "🕵️ Thoughts are now visible in responses!");

    let outcome = session.handle_message("  /TOGGLE_THOUGHTS  ", &sink).await;
    assert!(matches!(outcome, TurnOutcome::ThoughtsToggled { clean_output: true }));
    assert_eq!(sink.last(), "🕵️ Thoughts are now hidden in responses!");

    for _ in 0..4 {
        session.handle_message("/toggle_thoughts", &sink).await;
    }
    assert!(session.clean_output());

    session.handle_message("/Toggle_Thoughts", &sink).await;
    assert!(!session.clean_output());

    assert_eq!(session.memory_len(), 0);
    assert!(llm.calls().is_empty());
}

// ========================================================================
// Normal turns
// ========================================================================

#[tokio::test]
async fn test_clean_mode_strips_reasoning_from_display_and_memory() {
    let llm = MockLlm::new(vec![Ok("<think>reasoning</think>Hello!")]);
    let session = controller_with(llm);
    let sink = RecordingSink::default();

    let outcome = session.handle_message("Hi", &sink).await;

    match outcome {
        TurnOutcome::Answered { text } => assert_eq!(text, "Hello!"),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(sink.last(), "Hello!");
    assert_eq!(session.history(), vec![Turn::new("Hi", "Hello!")]);
}

#[tokio::test]
async fn test_raw_mode_keeps_reasoning_in_display_and_memory() {
    let llm = MockLlm::new(vec![Ok("<think>reasoning</think>Hello!")]);
    let session = controller_with(llm);
    let sink = RecordingSink::default();

    session.handle_message("/toggle_thoughts", &sink).await;
    let outcome = session.handle_message("Hi", &sink).await;

    match outcome {
        TurnOutcome::Answered { text } => assert_eq!(text, "<think>reasoning</think>Hello!"),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(sink.last(), "<think>reasoning</think>Hello!");
    assert_eq!(
        session.history(),
        vec![Turn::new("Hi", "<think>reasoning</think>Hello!")]
    );
}

#[tokio::test]
async fn test_nth_prompt_is_built_from_previous_turns_only() {
    let llm = MockLlm::new(vec![Ok("a1"), Ok("a2"), Ok("a3")]);
    let session = controller_with(llm.clone());
    let sink = RecordingSink::default();

    for question in ["q1", "q2", "q3"] {
        session.handle_message(question, &sink).await;
    }

    assert_eq!(
        session.history(),
        vec![Turn::new("q1", "a1"), Turn::new("q2", "a2"), Turn::new("q3", "a3")]
    );

    let calls = llm.calls();
    assert_eq!(calls.len(), 3);
    for (n, call) in calls.iter().enumerate() {
        // system + one user/assistant pair per earlier turn + the new question
        assert_eq!(call.len(), 2 * n + 2);
        assert_eq!(call.last().unwrap(), &Message::user(format!("q{}", n + 1)));
    }
    assert_eq!(calls[2][1], Message::user("q1"));
    assert_eq!(calls[2][2], Message::assistant("a1"));
    assert_eq!(calls[2][3], Message::user("q2"));
    assert_eq!(calls[2][4], Message::assistant("a2"));
}

#[tokio::test]
async fn test_query_text_is_sent_and_stored_verbatim() {
    let llm = MockLlm::new(vec![Ok("fine")]);
    let session = controller_with(llm.clone());
    let sink = RecordingSink::default();

    session.handle_message("  /help me  ", &sink).await;

    assert_eq!(llm.calls()[0].last().unwrap(), &Message::user("  /help me  "));
    assert_eq!(session.history()[0].input(), "  /help me  ");
}

// ========================================================================
// Failures
// ========================================================================

#[tokio::test]
async fn test_failure_leaves_memory_unchanged_and_session_usable() {
    let llm = MockLlm::new(vec![Ok("first"), Err("connection refused"), Ok("recovered")]);
    let session = controller_with(llm.clone());
    let sink = RecordingSink::default();

    session.handle_message("one", &sink).await;
    assert_eq!(session.memory_len(), 1);

    let outcome = session.handle_message("two", &sink).await;
    match outcome {
        TurnOutcome::Failed { error } => assert!(error.is_invocation_failure()),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(sink.last(), messages::INVOCATION_FAILED);
    assert_eq!(session.memory_len(), 1);
    assert_eq!(session.phase(), TurnPhase::Idle);

    let outcome = session.handle_message("three", &sink).await;
    assert!(matches!(outcome, TurnOutcome::Answered { .. }));
    assert_eq!(
        session.history(),
        vec![Turn::new("one", "first"), Turn::new("three", "recovered")]
    );

    // The failed question never reached memory, so the retry prompt skips it.
    let retry = &llm.calls()[2];
    assert_eq!(retry.len(), 4);
    assert!(!retry.iter().any(|m| m.content == "two"));
}

#[tokio::test(start_paused = true)]
async fn test_invocation_timeout_is_reported_as_failure() {
    let invoker = ModelInvoker::new(Arc::new(SlowLlm)).with_timeout(Duration::from_secs(5));
    let session = SessionController::new(SessionId::new_v4(), PromptAssembler::new(), invoker);
    let sink = RecordingSink::default();

    let outcome = session.handle_message("hello?", &sink).await;

    match outcome {
        TurnOutcome::Failed { error } => {
            assert!(matches!(error, ChatError::Timeout(d) if d == Duration::from_secs(5)))
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(sink.last(), messages::INVOCATION_FAILED);
    assert_eq!(session.memory_len(), 0);
    assert_eq!(session.phase(), TurnPhase::Idle);
}

// ========================================================================
// Concurrency within a session
// ========================================================================

#[tokio::test]
async fn test_toggle_during_turn_applies_to_next_turn() {
    let started = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let llm = Arc::new(GatedLlm {
        started: started.clone(),
        release: release.clone(),
        reply: "<think>private</think>Answer".to_string(),
    });
    let session = Arc::new(controller_with(llm));
    let sink = Arc::new(RecordingSink::default());

    let turn = tokio::spawn({
        let session = session.clone();
        let sink = sink.clone();
        async move { session.handle_message("question", sink.as_ref()).await }
    });

    started.notified().await;
    assert_eq!(session.phase(), TurnPhase::AwaitingModel);

    // Handled immediately even though a turn is in flight.
    let outcome = session.handle_message("/toggle_thoughts", sink.as_ref()).await;
    assert!(matches!(outcome, TurnOutcome::ThoughtsToggled { clean_output: false }));

    release.notify_one();
    let outcome = turn.await.unwrap();

    match outcome {
        TurnOutcome::Answered { text } => assert_eq!(text, "Answer"),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(session.history(), vec![Turn::new("question", "Answer")]);
    assert_eq!(session.phase(), TurnPhase::Idle);
    assert!(!session.clean_output());
}

// ========================================================================
// SessionRegistry
// ========================================================================

#[tokio::test]
async fn test_registry_lifecycle() {
    let registry = SessionRegistry::with_client(Settings::default(), MockLlm::new(vec![]));
    let sink = RecordingSink::default();
    assert!(registry.is_empty().await);

    let session = registry.start_session(&sink).await;

    assert_eq!(sink.sent(), vec![messages::WELCOME.to_string()]);
    assert_eq!(registry.len().await, 1);
    assert!(registry.get(&session.id()).await.is_some());
    assert_eq!(registry.session_ids().await, vec![session.id()]);

    registry.end_session(&session.id()).await.unwrap();
    assert!(registry.is_empty().await);
    assert!(registry.get(&session.id()).await.is_none());

    let again = registry.end_session(&session.id()).await;
    assert!(matches!(again, Err(ChatError::SessionNotFound(_))));
}

#[tokio::test]
async fn test_registry_sessions_are_isolated() {
    let llm = MockLlm::new(vec![Ok("for alice"), Ok("for bob")]);
    let registry = SessionRegistry::with_client(Settings::default(), llm.clone());
    let sink = RecordingSink::default();

    let alice = registry.start_session(&sink).await;
    let bob = registry.start_session(&sink).await;
    assert_ne!(alice.id(), bob.id());

    alice.handle_message("hi from alice", &sink).await;
    bob.handle_message("/toggle_thoughts", &sink).await;
    bob.handle_message("hi from bob", &sink).await;

    assert_eq!(alice.history(), vec![Turn::new("hi from alice", "for alice")]);
    assert_eq!(bob.history(), vec![Turn::new("hi from bob", "for bob")]);
    assert!(alice.clean_output());
    assert!(!bob.clean_output());

    // Bob's first prompt carries none of Alice's turns.
    assert_eq!(llm.calls()[1].len(), 2);
}

#[tokio::test]
async fn test_registry_applies_chat_settings() {
    let mut settings = Settings::default();
    settings.chat.clean_output_by_default = false;
    settings.chat.system_prompt = Some("Answer in one word.".to_string());
    let llm = MockLlm::new(vec![Ok("<think>x</think>Yes")]);
    let registry = SessionRegistry::with_client(settings, llm.clone());
    let sink = RecordingSink::default();

    let session = registry.start_session(&sink).await;
    assert!(!session.clean_output());

    session.handle_message("Is water wet?", &sink).await;

    assert_eq!(sink.last(), "<think>x</think>Yes");
    assert_eq!(llm.calls()[0][0], Message::system("Answer in one word."));
}
