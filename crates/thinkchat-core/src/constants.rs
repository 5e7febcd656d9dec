//! Centralized constants: model defaults, endpoints and every user-facing string.

// ─── Models ───────────────────────────────────────────────────────────────────

pub mod models {
    /// Small reasoning model that emits `<think>` blocks
    pub const DEFAULT_MODEL: &str = "deepseek-r1:1.5b";
}

// ─── API Endpoints ────────────────────────────────────────────────────────────

pub mod endpoints {
    pub const OLLAMA_BASE_URL: &str = "http://localhost:11434";
    pub const OLLAMA_CHAT_PATH: &str = "/api/chat";
}

// ─── Default Settings ─────────────────────────────────────────────────────────

pub mod defaults {
    pub const TEMPERATURE: f32 = 0.6;
    /// Maps to Ollama's `num_predict`.
    pub const MAX_TOKENS: u32 = 2000;
    pub const INVOCATION_TIMEOUT_SECS: u64 = 120;
    pub const CLEAN_OUTPUT: bool = true;
    pub const MAX_TEMPERATURE: f32 = 2.0;
}

// ─── Reasoning Markup ─────────────────────────────────────────────────────────

pub mod markup {
    pub const THINK_OPEN: &str = "<think>";
    pub const THINK_CLOSE: &str = "</think>";
}

// ─── Control Commands ─────────────────────────────────────────────────────────

pub mod commands {
    pub const TOGGLE_THOUGHTS: &str = "/toggle_thoughts";
}

// ─── User-facing Messages ─────────────────────────────────────────────────────

pub mod messages {
    pub const WELCOME: &str = "## 🚀 Let's go! \n\n\
### Quick Commands:\n\
- `/toggle_thoughts`: See behind-the-scenes thinking\n\n\
What topic shall we explore today? 🤔";

    pub const EMPTY_INPUT: &str =
        "Oops! Looks like your message is empty. What would you like to learn?";

    pub const INVOCATION_FAILED: &str =
        "🤖 Oops! Something went a bit wonky. Could you rephrase your question?";

    pub fn thoughts_toggled(clean_output: bool) -> String {
        format!(
            "🕵️ Thoughts are now {} in responses!",
            if clean_output { "hidden" } else { "visible" }
        )
    }
}
