//! Turn untyped verifier payloads into well-formed verdicts
//!
//! Every function here is total: malformed input degrades field by field
//! towards the fallback verdict instead of failing.

use crate::parser::parse_payload;
use crate::types::RawVerdict;
use ekmyth_domain::verdict::{DEFAULT_SOURCE_TITLE, FALLBACK_REASONING};
use ekmyth_domain::{Citation, Confidence, Source, Verdict, VerdictKind};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Normalize a raw verifier result
pub fn normalize_raw(raw: &RawVerdict) -> Verdict {
    normalize(&raw.payload, &raw.citations)
}

/// Normalize a payload and grounding citations into a verdict
///
/// - unknown or missing `verdict` → `UNCERTAIN`
/// - `confidence` rounded and clamped into `[0, 100]`, unusable → `0`
/// - missing or blank `reasoning` → fallback text
/// - suggested sources without a URL are dropped, missing titles defaulted
///
/// # Examples
///
/// ```
/// use ekmyth_verifier::normalize;
/// use ekmyth_domain::VerdictKind;
/// use serde_json::json;
///
/// let verdict = normalize(&json!({"verdict": "BOGUS", "confidence": "high"}), &[]);
/// assert_eq!(verdict.kind, VerdictKind::Uncertain);
/// assert_eq!(verdict.confidence.value(), 0);
/// ```
pub fn normalize(payload: &Value, citations: &[Citation]) -> Verdict {
    let Some(fields) = payload.as_object() else {
        warn!("Verifier payload is not an object, using fallback verdict");
        return Verdict::fallback();
    };

    let kind = fields
        .get("verdict")
        .and_then(Value::as_str)
        .and_then(VerdictKind::parse)
        .unwrap_or(VerdictKind::Uncertain);

    let confidence = fields
        .get("confidence")
        .map(normalize_confidence)
        .unwrap_or(Confidence::MIN);

    let reasoning = fields
        .get("reasoning")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .unwrap_or(FALLBACK_REASONING)
        .to_string();

    let suggested_sources = normalize_sources(citations, fields);

    debug!(
        "Normalized verdict {} at {} with {} suggested sources",
        kind,
        confidence,
        suggested_sources.len()
    );

    Verdict {
        kind,
        confidence,
        reasoning,
        suggested_sources,
    }
}

/// Parse a text response and normalize it; unparseable text yields the fallback
pub fn normalize_response(response: &str, citations: &[Citation]) -> Verdict {
    match parse_payload(response) {
        Ok(payload) => normalize(&payload, citations),
        Err(e) => {
            warn!("Could not parse verifier response: {}", e);
            Verdict::fallback()
        }
    }
}

fn normalize_confidence(value: &Value) -> Confidence {
    match value {
        Value::Number(number) => number
            .as_f64()
            .map(Confidence::from_f64)
            .unwrap_or(Confidence::MIN),
        Value::String(text) => Confidence::parse_lenient(text),
        _ => Confidence::MIN,
    }
}

/// Citations first, then any `suggestedSources` the model listed itself
fn normalize_sources(citations: &[Citation], fields: &Map<String, Value>) -> Vec<Source> {
    let from_citations = citations
        .iter()
        .filter_map(|citation| build_source(citation.uri.as_deref(), citation.title.as_deref()));

    let from_payload = fields
        .get("suggestedSources")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|entry| match entry {
            Value::String(url) => build_source(Some(url.as_str()), None),
            Value::Object(obj) => {
                let url = obj
                    .get("url")
                    .or_else(|| obj.get("uri"))
                    .and_then(Value::as_str);
                let title = obj.get("title").and_then(Value::as_str);
                build_source(url, title)
            }
            _ => None,
        });

    from_citations.chain(from_payload).collect()
}

fn build_source(url: Option<&str>, title: Option<&str>) -> Option<Source> {
    let url = url.map(str::trim).filter(|url| !url.is_empty())?;
    let title = title
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .unwrap_or(DEFAULT_SOURCE_TITLE);

    Some(Source::with_title(url, Some(title.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_well_formed_payload() {
        let verdict = normalize(
            &json!({"verdict": "BUSTED", "confidence": 95, "reasoning": "NASA says no."}),
            &[],
        );
        assert_eq!(verdict.kind, VerdictKind::Busted);
        assert_eq!(verdict.confidence.value(), 95);
        assert_eq!(verdict.reasoning, "NASA says no.");
    }

    #[test]
    fn test_bogus_payload_normalizes_to_fallback() {
        let verdict = normalize(&json!({"verdict": "BOGUS", "confidence": "high"}), &[]);
        assert_eq!(verdict.kind, VerdictKind::Uncertain);
        assert_eq!(verdict.confidence.value(), 0);
        assert_eq!(verdict.reasoning, FALLBACK_REASONING);
        assert!(verdict.is_fallback());
    }

    #[test]
    fn test_confidence_clamping() {
        let high = normalize(&json!({"confidence": 140}), &[]);
        assert_eq!(high.confidence.value(), 100);

        let low = normalize(&json!({"confidence": -3}), &[]);
        assert_eq!(low.confidence.value(), 0);

        let fractional = normalize(&json!({"confidence": 72.6}), &[]);
        assert_eq!(fractional.confidence.value(), 73);
    }

    #[test]
    fn test_confidence_from_strings() {
        assert_eq!(normalize(&json!({"confidence": "85"}), &[]).confidence.value(), 85);
        assert_eq!(normalize(&json!({"confidence": " 60 % "}), &[]).confidence.value(), 60);
        assert_eq!(normalize(&json!({"confidence": "NaN"}), &[]).confidence.value(), 0);
    }

    #[test]
    fn test_confidence_unusable_types() {
        for value in [json!(true), json!(null), json!([90]), json!({"value": 90})] {
            let verdict = normalize(&json!({"confidence": value}), &[]);
            assert_eq!(verdict.confidence.value(), 0);
        }
    }

    #[test]
    fn test_blank_reasoning_uses_fallback() {
        let verdict = normalize(&json!({"verdict": "VERIFIED", "reasoning": "   "}), &[]);
        assert_eq!(verdict.kind, VerdictKind::Verified);
        assert_eq!(verdict.reasoning, FALLBACK_REASONING);
    }

    #[test]
    fn test_non_object_payload() {
        assert!(normalize(&json!([1, 2, 3]), &[]).is_fallback());
        assert!(normalize(&json!("VERIFIED"), &[]).is_fallback());
    }

    #[test]
    fn test_citations_become_sources() {
        let citations = vec![
            Citation::new("https://www.nasa.gov/wall", Some("NASA".to_string())),
            Citation::new("https://bbc.com/x", None),
            Citation {
                uri: None,
                title: Some("orphan".to_string()),
            },
            Citation::new("   ", None),
        ];
        let verdict = normalize(&json!({"verdict": "BUSTED"}), &citations);

        assert_eq!(verdict.suggested_sources.len(), 2);
        assert_eq!(verdict.suggested_sources[0].domain(), "nasa.gov");
        assert_eq!(verdict.suggested_sources[0].title(), Some("NASA"));
        assert_eq!(verdict.suggested_sources[1].title(), Some(DEFAULT_SOURCE_TITLE));
    }

    #[test]
    fn test_payload_suggested_sources() {
        let verdict = normalize(
            &json!({
                "verdict": "VERIFIED",
                "suggestedSources": [
                    {"url": "https://who.int/a", "title": "WHO"},
                    {"title": "missing url"},
                    "https://cdc.gov/b",
                    42
                ]
            }),
            &[],
        );
        let domains: Vec<_> = verdict.suggested_sources.iter().map(|s| s.domain()).collect();
        assert_eq!(domains, vec!["who.int", "cdc.gov"]);
        assert_eq!(verdict.suggested_sources[1].title(), Some(DEFAULT_SOURCE_TITLE));
    }

    #[test]
    fn test_normalize_response_fenced() {
        let verdict = normalize_response(
            "```json\n{\"verdict\": \"partially_true\", \"confidence\": 55, \"reasoning\": \"Mixed.\"}\n```",
            &[],
        );
        assert_eq!(verdict.kind, VerdictKind::PartiallyTrue);
        assert_eq!(verdict.confidence.value(), 55);
    }

    #[test]
    fn test_normalize_response_garbage() {
        assert!(normalize_response("I cannot help with that.", &[]).is_fallback());
    }
}
