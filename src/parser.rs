//! Repair and decoding of JSON-shaped model output.
//!
//! Generative models wrap JSON in narration, markdown fences, typographic
//! quotes, or cut it off mid-structure. [`parse_model_json`] runs a fixed
//! sequence of repair strategies and decodes the first candidate that
//! yields a JSON value. It fails only after every strategy is exhausted,
//! and never silently returns partial or guessed data.
//!
//! Strategy order:
//! 1. The raw trimmed text
//! 2. The body of a markdown code fence, when present
//! 3. Truncation to the last balanced closing brace/bracket
//! 4. Appending the missing closers counted from an open/close tally
//! 5. Stripping a single trailing comma
//! 6. Jumping to the first `{` / `[` to skip leading prose
//! 7. Normalizing typographic quotes to ASCII
//!
//! Each candidate gets a strict decode, then a prefix decode that accepts
//! one valid JSON value followed by discarded (logged) trailing garbage,
//! then a final retry after trimming trailing separators.

use regex::Regex;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

const SNIPPET_LEN: usize = 120;

/// Raised when no repair strategy could decode the model output.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ExtractError {
    #[error("No repair strategy could decode model output; content starts with: '{snippet}'")]
    Unparsable { snippet: String },
}

/// Decodes model output into a JSON value, repairing common damage.
///
/// # Errors
///
/// Returns [`ExtractError::Unparsable`] with a short diagnostic snippet
/// when every strategy fails.
pub fn parse_model_json(raw: &str) -> Result<Value, ExtractError> {
    let trimmed = raw.trim();

    for (strategy, candidate) in candidates(trimmed) {
        if let Some(value) = decode_candidate(&candidate) {
            debug!(strategy, "model output decoded");
            return Ok(value);
        }
    }

    Err(ExtractError::Unparsable {
        snippet: snippet_of(trimmed),
    })
}

fn snippet_of(s: &str) -> String {
    s.chars().take(SNIPPET_LEN).collect()
}

fn candidates(trimmed: &str) -> Vec<(&'static str, String)> {
    let mut list = vec![("raw", trimmed.to_string())];

    if let Some(body) = code_fence_body(trimmed) {
        list.push(("code-fence", body));
    }
    if let Some(cut) = truncate_to_balanced(trimmed) {
        list.push(("truncate-balanced", cut));
    }
    if let Some(closed) = append_missing_closers(trimmed) {
        list.push(("append-closers", closed));
    }
    if let Some(stripped) = strip_trailing_comma(trimmed) {
        list.push(("strip-trailing-comma", stripped));
    }
    if let Some(tail) = from_first_delimiter(trimmed) {
        list.push(("skip-leading-prose", tail));
    }
    let normalized = normalize_quotes(trimmed);
    if normalized != trimmed {
        list.push(("ascii-quotes", normalized));
    }

    list
}

/// Strict decode, then prefix decode, then a retry with trailing
/// separators trimmed.
fn decode_candidate(candidate: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str(candidate) {
        return Some(value);
    }
    if let Some(value) = decode_prefix(candidate) {
        return Some(value);
    }
    let stripped = candidate.trim_end().trim_end_matches([',', ';']).trim_end();
    if stripped != candidate {
        return serde_json::from_str(stripped).ok();
    }
    None
}

/// Accepts one valid JSON value at the start of the candidate, discarding
/// whatever follows it. The discarded tail is logged, never returned.
fn decode_prefix(candidate: &str) -> Option<Value> {
    let mut stream = serde_json::Deserializer::from_str(candidate).into_iter::<Value>();
    let value = stream.next()?.ok()?;
    let rest = candidate[stream.byte_offset()..].trim();
    if !rest.is_empty() {
        debug!(
            discarded_bytes = rest.len(),
            "discarded trailing garbage after valid JSON prefix"
        );
    }
    Some(value)
}

/// Extracts the body of a ```json ... ``` (or generic ```) fence.
fn code_fence_body(s: &str) -> Option<String> {
    let re = Regex::new(r"```(?:json)?\s*\n?([\s\S]*?)\n?```").ok()?;
    let caps = re.captures(s)?;
    let body = caps.get(1)?.as_str().trim();
    if body.is_empty() {
        None
    } else {
        Some(body.to_string())
    }
}

/// Cuts the text at the last position where every opened brace/bracket is
/// balanced again, dropping trailing narration after complete JSON.
fn truncate_to_balanced(s: &str) -> Option<String> {
    let mut depth: i64 = 0;
    let mut in_string = false;
    let mut escape_next = false;
    let mut opened = false;
    let mut last_balanced: Option<usize> = None;

    for (i, c) in s.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            '{' | '[' if !in_string => {
                depth += 1;
                opened = true;
            }
            '}' | ']' if !in_string => {
                depth -= 1;
                if depth == 0 && opened {
                    last_balanced = Some(i);
                }
            }
            _ => {}
        }
    }

    let end = last_balanced?;
    if end + 1 >= s.len() {
        return None; // nothing to cut
    }
    Some(s[..=end].to_string())
}

/// Closes unterminated structures: a dangling string gets its quote, then
/// the unclosed braces/brackets are appended in reverse-open order.
fn append_missing_closers(s: &str) -> Option<String> {
    let mut stack: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escape_next = false;

    for c in s.chars() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            '{' | '[' if !in_string => stack.push(c),
            '}' if !in_string => {
                if stack.last() == Some(&'{') {
                    stack.pop();
                }
            }
            ']' if !in_string => {
                if stack.last() == Some(&'[') {
                    stack.pop();
                }
            }
            _ => {}
        }
    }

    if stack.is_empty() && !in_string {
        return None;
    }

    let mut repaired = s.to_string();
    if in_string {
        repaired.push('"');
    }
    while let Some(open) = stack.pop() {
        repaired.push(if open == '{' { '}' } else { ']' });
    }
    Some(repaired)
}

/// Removes one comma that sits (modulo whitespace and closers) at the end
/// of the text, e.g. `{"a": 1,}` or `[1, 2,]`.
fn strip_trailing_comma(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    let mut i = s.len();
    while i > 0 {
        let c = bytes[i - 1] as char;
        if c.is_ascii_whitespace() || c == '}' || c == ']' {
            i -= 1;
            continue;
        }
        if c == ',' {
            let mut out = String::with_capacity(s.len() - 1);
            out.push_str(&s[..i - 1]);
            out.push_str(&s[i..]);
            return Some(out);
        }
        return None;
    }
    None
}

/// Skips leading prose by jumping to the first `{` or `[`.
fn from_first_delimiter(s: &str) -> Option<String> {
    let idx = s.find(['{', '['])?;
    if idx == 0 {
        return None;
    }
    Some(s[idx..].to_string())
}

/// Replaces typographic quotes with their ASCII equivalents.
fn normalize_quotes(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' => '"',
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' => '\'',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_json_decodes_directly() {
        let value = parse_model_json(r#"{"key": "value", "list": [1, 2]}"#).unwrap();
        assert_eq!(value, json!({"key": "value", "list": [1, 2]}));
    }

    #[test]
    fn test_equivalent_repairs_decode_to_same_object() {
        let expected = json!({"focus_areas": ["apis", "caching"], "hours": 6});

        let variants = [
            // Clean
            r#"{"focus_areas": ["apis", "caching"], "hours": 6}"#.to_string(),
            // Trailing prose
            r#"{"focus_areas": ["apis", "caching"], "hours": 6} Hope this helps!"#.to_string(),
            // Missing one closing brace
            r#"{"focus_areas": ["apis", "caching"], "hours": 6"#.to_string(),
            // One trailing comma
            r#"{"focus_areas": ["apis", "caching"], "hours": 6,}"#.to_string(),
            // Leading narration
            r#"Here is your plan: {"focus_areas": ["apis", "caching"], "hours": 6}"#.to_string(),
        ];

        for variant in &variants {
            let value = parse_model_json(variant)
                .unwrap_or_else(|e| panic!("failed on {:?}: {}", variant, e));
            assert_eq!(value, expected, "mismatch for {:?}", variant);
        }
    }

    #[test]
    fn test_pure_prose_is_unparsable() {
        let err = parse_model_json("I could not produce the plan, sorry.").unwrap_err();
        let ExtractError::Unparsable { snippet } = err;
        assert!(snippet.contains("I could not"));
    }

    #[test]
    fn test_empty_input_is_unparsable() {
        assert!(parse_model_json("").is_err());
        assert!(parse_model_json("  \n\t ").is_err());
    }

    #[test]
    fn test_code_fence() {
        let input = "Sure:\n```json\n{\"a\": 1}\n```\nDone.";
        assert_eq!(parse_model_json(input).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_generic_code_fence() {
        let input = "```\n[1, 2, 3]\n```";
        assert_eq!(parse_model_json(input).unwrap(), json!([1, 2, 3]));
    }

    #[test]
    fn test_deeply_truncated_object_is_closed() {
        let input = r#"{"a": {"b": {"c": "val"#;
        assert_eq!(
            parse_model_json(input).unwrap(),
            json!({"a": {"b": {"c": "val"}}})
        );
    }

    #[test]
    fn test_truncated_array_of_objects() {
        let input = r#"[{"id": 1}, {"id": 2"#;
        assert_eq!(parse_model_json(input).unwrap(), json!([{"id": 1}, {"id": 2}]));
    }

    #[test]
    fn test_trailing_comma_in_array() {
        assert_eq!(parse_model_json("[1, 2, 3,]").unwrap(), json!([1, 2, 3]));
    }

    #[test]
    fn test_typographic_quotes() {
        let input = "{\u{201C}key\u{201D}: \u{201C}value\u{201D}}";
        assert_eq!(parse_model_json(input).unwrap(), json!({"key": "value"}));
    }

    #[test]
    fn test_narration_before_and_after() {
        let input = r#"Thinking... the answer: {"done": true} — let me know!"#;
        assert_eq!(parse_model_json(input).unwrap(), json!({"done": true}));
    }

    #[test]
    fn test_string_aware_tally_ignores_braces_in_strings() {
        let input = r#"{"note": "use { and [ freely"}"#;
        assert_eq!(
            parse_model_json(input).unwrap(),
            json!({"note": "use { and [ freely"})
        );
    }

    #[test]
    fn test_append_missing_closers_helper() {
        assert_eq!(
            append_missing_closers(r#"{"items": [{"id": 1}"#),
            Some(r#"{"items": [{"id": 1}]}"#.to_string())
        );
        assert_eq!(append_missing_closers("{}"), None);
    }

    #[test]
    fn test_strip_trailing_comma_helper() {
        assert_eq!(
            strip_trailing_comma(r#"{"a": 1,}"#),
            Some(r#"{"a": 1}"#.to_string())
        );
        assert_eq!(strip_trailing_comma(r#"{"a": 1}"#), None);
    }

    #[test]
    fn test_snippet_is_bounded() {
        let long = "x".repeat(500);
        let err = parse_model_json(&long).unwrap_err();
        let ExtractError::Unparsable { snippet } = err;
        assert!(snippet.chars().count() <= SNIPPET_LEN);
    }
}
