// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting fragments only.

/// Brand-context fallback used when no brand is attached to a request.
pub const NO_BRAND_CONTEXT: &str =
    "No specific brand context provided - use a professional, friendly tone.";

/// Renders an optional list field the way every prompt expects it.
pub fn join_or_unspecified(items: &[String]) -> String {
    if items.is_empty() {
        "Not specified".to_string()
    } else {
        items.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_or_unspecified() {
        assert_eq!(join_or_unspecified(&[]), "Not specified");
        assert_eq!(
            join_or_unspecified(&["Bold".to_string(), "Warm".to_string()]),
            "Bold, Warm"
        );
    }
}
