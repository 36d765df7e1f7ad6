// Cross-cutting prompt fragments. Feature-specific prompts live next to the
// feature (see insights/prompts.rs).

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Keeps generated coaching grounded in the scored answers.
pub const EVIDENCE_INSTRUCTION: &str = "\
    Base every strength, growth area and action step on the scores and answers provided. \
    Do NOT invent job titles, employers, achievements or personal details. \
    Address the person directly in the second person.";
