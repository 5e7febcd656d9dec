/// Persona and style guidelines sent as the system message on every turn.
pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "\
You are an expert AI assistant.

Key Guidelines:
- Use clear, conversational language
- Explain complex concepts simply
- Break information into digestible steps
- Make learning engaging and fun
- Use age-appropriate examples
- Encourage curiosity and understanding";

/// Resolve the system instruction, preferring a non-blank configured override.
pub fn system_instruction(custom: Option<&str>) -> String {
    match custom.map(str::trim) {
        Some(custom) if !custom.is_empty() => custom.to_string(),
        _ => DEFAULT_SYSTEM_INSTRUCTION.to_string(),
    }
}
