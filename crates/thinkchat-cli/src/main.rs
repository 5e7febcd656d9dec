use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

mod app;
mod commands;

#[derive(Parser)]
#[command(name = "thinkchat")]
#[command(about = "thinkchat - chat with a local Ollama model")]
#[command(version)]
struct Cli {
    /// Run a single prompt and exit
    #[arg(short, long)]
    prompt: Option<String>,

    /// Ollama model to use
    #[arg(short, long)]
    model: Option<String>,

    /// Ollama server address
    #[arg(long)]
    base_url: Option<String>,

    /// Sampling temperature
    #[arg(long)]
    temperature: Option<f32>,

    /// Maximum tokens to generate per reply
    #[arg(long)]
    max_tokens: Option<u32>,

    /// Seconds to wait for the model before giving up
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Config file to read instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start with <think> blocks visible
    #[arg(long)]
    show_thoughts: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn,thinkchat_core=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut settings = match cli.config {
        Some(ref path) => thinkchat_core::Settings::load_from(path)?,
        None => thinkchat_core::Settings::load(),
    };

    if let Some(model) = cli.model {
        settings.model.model = model;
    }
    if let Some(base_url) = cli.base_url {
        settings.model.base_url = base_url;
    }
    if let Some(temperature) = cli.temperature {
        settings.model.temperature = temperature;
    }
    if let Some(max_tokens) = cli.max_tokens {
        settings.model.max_tokens = max_tokens;
    }
    if let Some(timeout_secs) = cli.timeout_secs {
        settings.model.timeout_secs = timeout_secs;
    }
    if cli.show_thoughts {
        settings.chat.clean_output_by_default = false;
    }
    settings.validate()?;

    if let Some(prompt) = cli.prompt {
        app::run_single_prompt(settings, &prompt).await?;
    } else {
        app::run_interactive(settings).await?;
    }

    Ok(())
}
