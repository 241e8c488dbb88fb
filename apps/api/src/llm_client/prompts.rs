// Shared prompt fragments. Feature-specific prompts live next to the feature
// (see analysis/prompts.rs).

/// System message sent with every completion request.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    When asked for a JSON object, respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";
