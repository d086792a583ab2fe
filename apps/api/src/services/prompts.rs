// Prompt constants for the LLM-backed item generator.

/// System prompt for question generation. Combined with the JSON-only rule at call time.
pub const ITEM_GENERATION_SYSTEM: &str =
    "You are an experienced technical interviewer preparing a candidate-specific \
    interview. Questions must be grounded in the candidate profile you are given.";

/// Replace `{max_items}` and `{profile_json}` before sending.
pub const ITEM_GENERATION_PROMPT_TEMPLATE: &str = r#"Write at most {max_items} interview questions for the candidate described below.

Return a JSON array where every element has this EXACT shape (no extra fields):
{
  "id": "1",
  "text": "Walk me through the settlement pipeline rewrite.",
  "category": "experience",
  "difficulty": "medium",
  "notes": "Listen for ownership and measurable outcomes.",
  "ideal_answer": "Context, constraints, approach, result with numbers."
}

Rules:
- "category" is one of: "technical", "behavioral", "experience", "strength", "weakness".
- "difficulty" is one of: "easy", "medium", "hard".
- "id" values are unique strings.
- Cover every category at least once when the profile supports it.
- Reference concrete employers, skills and claims from the profile.

Candidate profile:
{profile_json}"#;
