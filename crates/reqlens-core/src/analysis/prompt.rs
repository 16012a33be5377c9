//! Prompt construction and truncation for document analysis

use super::schema::Level;

/// System instruction sent with every analysis request
pub const ANALYSIS_SYSTEM_PROMPT: &str = "You are a senior business analyst. You read project \
documents and extract requirements, risks and keywords. Respond ONLY with one valid JSON object \
matching the requested schema, with no markdown and no commentary.";

/// Document text after applying the character ceiling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedDocument {
    /// Text to embed in the prompt (marker included when truncated)
    pub text: String,
    pub truncated: bool,
    /// Length of the caller's text in characters
    pub original_chars: usize,
}

/// Marker appended after a truncated document
pub fn truncation_marker(kept: usize, original: usize) -> String {
    format!("\n\n[... document truncated: showing first {kept} of {original} characters ...]")
}

/// Cut `text` to `max_chars` characters and append a visible marker when anything was dropped
pub fn prepare_document(text: &str, max_chars: usize) -> PreparedDocument {
    let original_chars = text.chars().count();
    if original_chars <= max_chars {
        return PreparedDocument {
            text: text.to_string(),
            truncated: false,
            original_chars,
        };
    }

    // Byte offset of the first character past the ceiling
    let cut = text
        .char_indices()
        .nth(max_chars)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len());

    let mut truncated = String::with_capacity(cut + 96);
    truncated.push_str(&text[..cut]);
    truncated.push_str(&truncation_marker(max_chars, original_chars));

    PreparedDocument {
        text: truncated,
        truncated: true,
        original_chars,
    }
}

/// Embed document text in the schema-constrained instruction template
pub fn build_analysis_prompt(document: &str) -> String {
    let levels = Level::ALLOWED
        .iter()
        .map(|l| format!("\"{l}\""))
        .collect::<Vec<_>>()
        .join(" | ");

    format!(
        r#"Analyze the following project document and extract a structured requirements analysis.

Document:
<<<DOCUMENT
{document}
DOCUMENT>>>

Output a single JSON object with EXACTLY this shape:
{{
  "projectOverview": {{
    "title": "short project name",
    "description": "2-4 sentence summary",
    "scope": "what is in and out of scope",
    "objectives": ["objective 1", "objective 2"]
  }},
  "functionalRequirements": [
    {{
      "title": "requirement name",
      "description": "what the system must do",
      "priority": {levels},
      "category": "functional area",
      "acceptanceCriteria": ["testable criterion"],
      "estimatedEffort": 3
    }}
  ],
  "nonFunctionalRequirements": [
    {{
      "title": "requirement name",
      "description": "quality attribute",
      "category": "performance | security | usability | reliability | other",
      "priority": {levels},
      "metric": "how it is measured",
      "targetValue": "target for the metric"
    }}
  ],
  "keywords": ["keyword"],
  "riskFactors": [
    {{
      "title": "risk name",
      "description": "what could go wrong",
      "probability": {levels},
      "impact": {levels},
      "mitigation": "how to reduce the risk"
    }}
  ],
  "confidenceScore": 0.0
}}

RULES:
- "priority", "probability" and "impact" MUST be exactly one of: {levels} (lowercase).
- "estimatedEffort" is a non-negative number of person-days.
- "confidenceScore" is a number between 0 and 1 describing how well the document supports this analysis.
- If the document says it was truncated, lower the confidenceScore accordingly.
- Use empty arrays when nothing applies; never omit a field.

JSON:"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_short_text_untouched() {
        let prepared = prepare_document("hello", 10);
        assert_eq!(prepared.text, "hello");
        assert!(!prepared.truncated);
        assert_eq!(prepared.original_chars, 5);
    }

    #[test]
    fn test_exact_ceiling_untouched() {
        let text = "a".repeat(10);
        let prepared = prepare_document(&text, 10);
        assert_eq!(prepared.text, text);
        assert!(!prepared.truncated);
    }

    #[test]
    fn test_truncates_on_char_boundary() {
        let text = "ééééé"; // 5 chars, 10 bytes
        let prepared = prepare_document(text, 3);
        assert!(prepared.truncated);
        assert!(prepared.text.starts_with("ééé\n\n[... document truncated"));
        assert!(prepared.text.ends_with(&truncation_marker(3, 5)));
    }

    #[test]
    fn test_prompt_lists_enum_values() {
        let prompt = build_analysis_prompt("doc body");
        assert!(prompt.contains("doc body"));
        assert!(prompt.contains(r#""high" | "medium" | "low""#));
        assert!(prompt.contains("\"confidenceScore\""));
        assert!(prompt.contains("\"nonFunctionalRequirements\""));
    }

    proptest! {
        #[test]
        fn prop_within_ceiling_is_verbatim(text in "\\PC{0,200}") {
            let prepared = prepare_document(&text, 200);
            prop_assert!(!prepared.truncated);
            prop_assert_eq!(prepared.text, text);
        }

        #[test]
        fn prop_over_ceiling_keeps_exact_prefix_and_marker(text in "\\PC{51,300}") {
            let prepared = prepare_document(&text, 50);
            let original = text.chars().count();
            let marker = truncation_marker(50, original);
            let expected_prefix: String = text.chars().take(50).collect();

            prop_assert!(prepared.truncated);
            prop_assert_eq!(prepared.original_chars, original);
            prop_assert!(prepared.text.ends_with(&marker));
            let kept = &prepared.text[..prepared.text.len() - marker.len()];
            prop_assert_eq!(kept.chars().count(), 50);
            prop_assert_eq!(kept, expected_prefix.as_str());
        }
    }
}
