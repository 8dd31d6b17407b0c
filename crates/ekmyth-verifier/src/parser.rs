//! Parse LLM output into an untyped JSON payload

use crate::error::VerifierError;
use serde_json::Value;

/// Parse an LLM text response into a JSON value
///
/// Markdown fences and any prose around the object are removed first.
pub fn parse_payload(response: &str) -> Result<Value, VerifierError> {
    let json_str = extract_json(response)?;
    Ok(serde_json::from_str(json_str)?)
}

/// Extract the JSON text from a response, handling markdown code blocks
///
/// LLMs wrap JSON in fences even when told not to, sometimes with a sentence
/// before or after it.
pub fn extract_json(response: &str) -> Result<&str, VerifierError> {
    let trimmed = response.trim();
    if trimmed.is_empty() {
        return Err(VerifierError::InvalidFormat("Empty response".to_string()));
    }

    let unfenced = strip_fences(trimmed);
    if unfenced.is_empty() {
        return Err(VerifierError::InvalidFormat("Empty code block".to_string()));
    }

    Ok(isolate_object(unfenced))
}

/// Take the body of the first fenced block (language tag dropped)
fn strip_fences(text: &str) -> &str {
    let Some(start) = text.find("```") else {
        return text;
    };

    let after = text[start + 3..].trim_start_matches(|c: char| c.is_ascii_alphabetic());
    let end = after.rfind("```").unwrap_or(after.len());
    after[..end].trim()
}

/// Cut an object out of surrounding prose
fn isolate_object(text: &str) -> &str {
    if text.starts_with('{') || text.starts_with('[') {
        return text;
    }

    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_json() {
        let value = parse_payload(r#"{"verdict": "BUSTED", "confidence": 90}"#).unwrap();
        assert_eq!(value["verdict"], "BUSTED");
        assert_eq!(value["confidence"], 90);
    }

    #[test]
    fn test_parse_json_with_markdown_wrapper() {
        let response = r#"```json
{
    "verdict": "VERIFIED",
    "confidence": 88,
    "reasoning": "NASA confirms."
}
```"#;
        let value = parse_payload(response).unwrap();
        assert_eq!(value["verdict"], "VERIFIED");
    }

    #[test]
    fn test_extract_json_from_markdown_without_language() {
        let response = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(extract_json(response).unwrap(), r#"{"key": "value"}"#);
    }

    #[test]
    fn test_extract_json_inline_fence() {
        let response = "```json {\"key\": 1}```";
        assert_eq!(extract_json(response).unwrap(), r#"{"key": 1}"#);
    }

    #[test]
    fn test_extract_json_with_surrounding_prose() {
        let response = "Here is my analysis:\n{\"verdict\": \"UNCERTAIN\"}\nHope this helps.";
        assert_eq!(extract_json(response).unwrap(), r#"{"verdict": "UNCERTAIN"}"#);
    }

    #[test]
    fn test_extract_json_unterminated_fence() {
        let response = "```json\n{\"key\": true}";
        assert_eq!(extract_json(response).unwrap(), r#"{"key": true}"#);
    }

    #[test]
    fn test_empty_response() {
        assert!(matches!(extract_json("   "), Err(VerifierError::InvalidFormat(_))));
        assert!(matches!(extract_json("``````"), Err(VerifierError::InvalidFormat(_))));
    }

    #[test]
    fn test_parse_invalid_json() {
        let result = parse_payload("This is not JSON");
        assert!(matches!(result, Err(VerifierError::InvalidFormat(_))));
    }
}
