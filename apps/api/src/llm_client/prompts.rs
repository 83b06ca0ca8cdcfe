// Shared prompt fragments. Each module that calls the LLM keeps its own
// prompts.rs alongside it; only cross-cutting pieces live here.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a careful hiring analyst. \
    Answer with a single JSON object and nothing else: \
    no prose before or after it, no markdown fences, no commentary.";

/// Appended to a structured prompt ahead of the JSON schema. Replace `{schema}`.
pub const SCHEMA_INSTRUCTION_TEMPLATE: &str = "\n\nRespond with a JSON object that matches \
    this schema exactly (no extra fields):\n{schema}\n\nRespond ONLY with the JSON object.";
