// Shared prompt fragments.
// Each feature that calls the LLM keeps its own prompts.rs alongside it;
// this file only holds what several of them reuse.

/// System instruction for every JSON-mode call.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON value. \
    Do NOT use markdown code fences.";

/// Opening line of every writing prompt.
pub const RESUME_WRITER_PERSONA: &str = "You are an expert resume writer. ";
