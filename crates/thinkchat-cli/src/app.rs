use anyhow::Result;
use thinkchat_core::{ChatError, MessageSink, SessionRegistry, Settings, TurnOutcome};
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::commands::{handle_command, CommandResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Stdout,
    Stderr,
}

/// Prints every outbound message to a terminal stream, separated by a blank line.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleSink {
    stream: Stream,
}

impl ConsoleSink {
    pub fn stdout() -> Self {
        Self {
            stream: Stream::Stdout,
        }
    }

    pub fn stderr() -> Self {
        Self {
            stream: Stream::Stderr,
        }
    }
}

async fn write_flushed<W: AsyncWrite + Unpin>(mut out: W, bytes: &[u8]) -> std::io::Result<()> {
    out.write_all(bytes).await?;
    out.flush().await
}

#[async_trait::async_trait]
impl MessageSink for ConsoleSink {
    async fn send(&self, content: &str) -> Result<(), ChatError> {
        let line = format!("{content}\n\n");
        match self.stream {
            Stream::Stdout => write_flushed(tokio::io::stdout(), line.as_bytes()).await?,
            Stream::Stderr => write_flushed(tokio::io::stderr(), line.as_bytes()).await?,
        }
        Ok(())
    }
}

// ── Single prompt ───────────────────────────────────────────────────────

/// Run one prompt through a fresh session. The welcome goes to `banner` so
/// `output` carries only the answer.
pub async fn answer_once(
    registry: &SessionRegistry,
    prompt: &str,
    banner: &dyn MessageSink,
    output: &dyn MessageSink,
) -> Result<()> {
    let session = registry.start_session(banner).await;

    let outcome = session.handle_message(prompt, output).await;
    registry.end_session(&session.id()).await?;

    if let TurnOutcome::Failed { error } = outcome {
        return Err(error.into());
    }
    Ok(())
}

pub async fn run_single_prompt(settings: Settings, prompt: &str) -> Result<()> {
    let registry = SessionRegistry::new(settings);
    answer_once(
        &registry,
        prompt,
        &ConsoleSink::stderr(),
        &ConsoleSink::stdout(),
    )
    .await
}

// ── Interactive chat ────────────────────────────────────────────────────

pub async fn run_interactive(settings: Settings) -> Result<()> {
    let registry = SessionRegistry::new(settings);
    let sink = ConsoleSink::stdout();

    let session = registry.start_session(&sink).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if handle_command(&line) == CommandResult::Quit {
            break;
        }
        session.handle_message(&line, &sink).await;
    }

    registry.end_session(&session.id()).await?;
    Ok(())
}
