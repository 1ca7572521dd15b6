//! Parsing structured output out of free-running agent text.
//!
//! Agents are told to answer with a bare JSON object, but answers still
//! arrive wrapped in code fences or padded with prose. Parsing is best
//! effort: strip fences, try the whole text, then fall back to the first
//! balanced `{ ... }` block.

use regex::Regex;
use serde::de::DeserializeOwned;
use std::sync::LazyLock;
use tessera_error::{NarrativeError, NarrativeErrorKind};

static FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(?:json)?\s*").expect("Valid fence regex"));

/// Remove every ```` ```json ```` and ```` ``` ```` marker and trim.
///
/// # Examples
///
/// ```
/// use tessera_narrative::strip_code_fences;
///
/// assert_eq!(strip_code_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
/// assert_eq!(strip_code_fences("  plain  "), "plain");
/// ```
pub fn strip_code_fences(raw: &str) -> String {
    FENCE.replace_all(raw, "").trim().to_string()
}

/// First balanced `{ ... }` block, respecting string literals.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in text[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + i + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parse an agent's structured answer into `T`.
///
/// # Errors
///
/// Returns [`NarrativeErrorKind::ResponseShape`] when no candidate parses.
///
/// # Examples
///
/// ```
/// use serde::Deserialize;
/// use tessera_narrative::parse_structured;
///
/// #[derive(Deserialize)]
/// struct Answer { ok: bool }
///
/// let answer: Answer = parse_structured("Sure! ```json\n{\"ok\": true}\n``` Hope that helps.").unwrap();
/// assert!(answer.ok);
/// assert!(parse_structured::<Answer>("I'd rather not").is_err());
/// ```
pub fn parse_structured<T: DeserializeOwned>(raw: &str) -> Result<T, NarrativeError> {
    let cleaned = strip_code_fences(raw);
    let first_error = match serde_json::from_str::<T>(&cleaned) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    if let Some(candidate) = extract_json_object(&cleaned)
        && let Ok(value) = serde_json::from_str::<T>(candidate)
    {
        return Ok(value);
    }

    tracing::debug!(
        response_length = raw.len(),
        error = %first_error,
        "No parsable JSON object in response"
    );
    Err(NarrativeError::new(NarrativeErrorKind::ResponseShape(format!(
        "{} (response length {})",
        first_error,
        raw.len()
    ))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_strips_bare_fences() {
        assert_eq!(strip_code_fences("```\n{}\n```"), "{}");
    }

    #[test]
    fn test_balanced_skips_braces_in_strings() {
        let text = r#"note: {"a": "}{", "b": {"c": 1}} trailing }"#;
        assert_eq!(
            extract_json_object(text),
            Some(r#"{"a": "}{", "b": {"c": 1}}"#)
        );
    }

    #[test]
    fn test_balanced_handles_escaped_quotes() {
        let text = r#"{"a": "say \"hi\" }"}"#;
        assert_eq!(extract_json_object(text), Some(text));
    }

    #[test]
    fn test_unbalanced_yields_none() {
        assert_eq!(extract_json_object(r#"{"a": 1"#), None);
    }

    #[test]
    fn test_parse_prose_wrapped_object() {
        let value: Value = parse_structured("Here you go: {\"x\": 2} enjoy").unwrap();
        assert_eq!(value["x"], 2);
    }

    #[test]
    fn test_parse_failure_is_response_shape() {
        let err = parse_structured::<Value>("no json here").unwrap_err();
        assert!(matches!(err.kind, NarrativeErrorKind::ResponseShape(_)));
    }
}
