// src/llm/extract.rs
// JSON payload extraction from free-form model text

use regex::Regex;
use std::sync::LazyLock;

/// First fenced block, optionally tagged `json`
static FENCED_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    // SAFETY: This is a static literal regex pattern; compilation cannot fail.
    #[allow(clippy::expect_used)]
    Regex::new(r"```(?:json)?\s*([\s\S]*?)```").expect("fenced block regex")
});

/// Pull the JSON candidate out of a model response.
///
/// Precedence:
/// 1. content of the first fenced code block, if any fence pair exists;
/// 2. the longest balanced `{...}` span (first one wins on equal length);
/// 3. the raw text, trimmed.
///
/// Known false-extraction risk: when prose embeds a larger brace span (an
/// example object, say) than the real answer, step 2 picks the example.
pub fn extract_json(text: &str) -> &str {
    if let Some(block) = FENCED_BLOCK_RE
        .captures(text)
        .and_then(|c| c.get(1))
    {
        return block.as_str().trim();
    }

    if let Some(span) = longest_brace_span(text) {
        return span;
    }

    text.trim()
}

/// Longest top-level balanced brace span.
///
/// Braces inside JSON string literals do not count. If no span ever
/// balances (truncated output), falls back to first `{` through last `}`.
fn longest_brace_span(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut best: Option<(usize, usize)> = None;
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate() {
        if depth > 0 && in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match b {
            b'"' if depth > 0 => in_string = true,
            b'{' => {
                if depth == 0 {
                    start = i;
                }
                depth += 1;
            }
            b'}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    let len = i + 1 - start;
                    if best.is_none_or(|(s, e)| len > e - s) {
                        best = Some((start, i + 1));
                    }
                }
            }
            _ => {}
        }
    }

    if let Some((s, e)) = best {
        return Some(&text[s..e]);
    }

    let first = text.find('{')?;
    let last = text.rfind('}')?;
    (last > first).then(|| &text[first..=last])
}

#[cfg(test)]
mod tests {
    use super::*;

    // ============================================================================
    // Fenced blocks
    // ============================================================================

    #[test]
    fn test_fenced_json_block_with_prose() {
        let text = "Here is the analysis:\n```json\n{\"subject\": \"math\"}\n```\nHope this helps!";
        assert_eq!(extract_json(text), "{\"subject\": \"math\"}");
    }

    #[test]
    fn test_untagged_fence() {
        let text = "```\n{\"a\": 1}\n```";
        assert_eq!(extract_json(text), "{\"a\": 1}");
    }

    #[test]
    fn test_first_fence_wins() {
        let text = "```json\n{\"first\": 1}\n```\nand\n```json\n{\"second\": 22222}\n```";
        assert_eq!(extract_json(text), "{\"first\": 1}");
    }

    #[test]
    fn test_fence_preferred_over_longer_bare_span() {
        let text = "{\"long\": \"xxxxxxxxxxxxxxxxxxxxxxxx\"}\n```json\n{\"a\": 1}\n```";
        assert_eq!(extract_json(text), "{\"a\": 1}");
    }

    // ============================================================================
    // Bare brace spans
    // ============================================================================

    #[test]
    fn test_bare_object_with_prose() {
        let text = "Sure! {\"subject\": \"english\"} Let me know.";
        assert_eq!(extract_json(text), "{\"subject\": \"english\"}");
    }

    #[test]
    fn test_longest_of_two_spans() {
        let text = "Example: {\"a\": 1}. Answer: {\"subject\": \"math\", \"topic\": \"math.x\"}";
        assert_eq!(extract_json(text), "{\"subject\": \"math\", \"topic\": \"math.x\"}");
    }

    #[test]
    fn test_longer_span_first() {
        let text = "{\"subject\": \"math\", \"topic\": \"t\"} then {\"b\": 2}";
        assert_eq!(extract_json(text), "{\"subject\": \"math\", \"topic\": \"t\"}");
    }

    #[test]
    fn test_equal_length_first_occurrence() {
        let text = "{\"a\": 1} or {\"b\": 2}";
        assert_eq!(extract_json(text), "{\"a\": 1}");
    }

    #[test]
    fn test_nested_object_kept_whole() {
        let text = "x {\"outer\": {\"inner\": {}}} y";
        assert_eq!(extract_json(text), "{\"outer\": {\"inner\": {}}}");
    }

    #[test]
    fn test_braces_inside_strings_ignored() {
        let text = r#"{"explanation": "use } and { carefully \" }"} trailing"#;
        assert_eq!(
            extract_json(text),
            r#"{"explanation": "use } and { carefully \" }"}"#
        );
    }

    #[test]
    fn test_latex_braces_in_strings() {
        let text = r#"{"key_idea": "$\\frac{3}{4}$"}"#;
        assert_eq!(extract_json(text), text);
    }

    #[test]
    fn test_unbalanced_falls_back_to_outer_braces() {
        let text = "start {\"a\": {\"b\": 1} end";
        assert_eq!(extract_json(text), "{\"a\": {\"b\": 1}");
        let truncated = "{\"a\": \"never closed";
        assert_eq!(extract_json(truncated), truncated);
    }

    // ============================================================================
    // Raw fallback
    // ============================================================================

    #[test]
    fn test_no_json_returns_trimmed() {
        assert_eq!(extract_json("  I cannot read this image.  \n"), "I cannot read this image.");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(extract_json(""), "");
    }
}
