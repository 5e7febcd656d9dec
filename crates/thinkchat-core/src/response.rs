use regex::Regex;
use std::sync::OnceLock;

use crate::constants::markup::{THINK_CLOSE, THINK_OPEN};

fn think_block() -> &'static Regex {
    static THINK_BLOCK: OnceLock<Regex> = OnceLock::new();
    THINK_BLOCK.get_or_init(|| {
        // (?s): `.` spans newlines; `*?` stops at the first closing tag.
        let pattern = format!(
            "(?s){}.*?{}",
            regex::escape(THINK_OPEN),
            regex::escape(THINK_CLOSE)
        );
        Regex::new(&pattern).expect("valid think regex")
    })
}

/// Post-processes raw model output before it is displayed and stored.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseProcessor;

impl ResponseProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Remove every `<think>…</think>` segment and trim the ends.
    pub fn clean(&self, raw: &str) -> String {
        think_block().replace_all(raw, "").trim().to_string()
    }

    pub fn passthrough(&self, raw: &str) -> String {
        raw.to_string()
    }

    /// `clean` when `clean_output` is set, `passthrough` otherwise.
    pub fn process(&self, raw: &str, clean_output: bool) -> String {
        if clean_output {
            self.clean(raw)
        } else {
            self.passthrough(raw)
        }
    }

    pub fn has_reasoning(&self, raw: &str) -> bool {
        think_block().is_match(raw)
    }
}
