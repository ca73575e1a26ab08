//! Parsing and validation of the model's generated text.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;

use crate::error::{AnalysisError, Result};

/// Validated score and summary for a policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub score: f64,
    pub summary: String,
}

/// Extract and validate the JSON object embedded in generated text.
///
/// Takes everything from the first `{` to the last `}` so that markdown fences
/// or commentary around the object are ignored. Types are checked strictly:
/// `score` must be a JSON number and `summary` a non-empty JSON string.
pub fn parse_analysis(raw: &str) -> Result<AnalysisResult> {
    let json = extract_json_object(raw).ok_or_else(|| {
        error!("Could not find valid JSON object boundaries in text: {}", raw);
        AnalysisError::NoJsonFound
    })?;

    let value: Value = serde_json::from_str(json).map_err(|e| {
        error!("Failed to parse JSON from API response: {} (raw: {})", e, raw);
        AnalysisError::InvalidJson(e.to_string())
    })?;

    let score = value.get("score").and_then(Value::as_f64);
    let summary = value
        .get("summary")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty());

    match (score, summary) {
        (Some(score), Some(summary)) => Ok(AnalysisResult {
            score,
            summary: summary.to_string(),
        }),
        (None, _) => {
            error!("Parsed JSON does not match expected format: {}", value);
            Err(AnalysisError::SchemaMismatch(
                "\"score\" must be a number".to_string(),
            ))
        }
        (_, None) => {
            error!("Parsed JSON does not match expected format: {}", value);
            Err(AnalysisError::SchemaMismatch(
                "\"summary\" must be non-empty text".to_string(),
            ))
        }
    }
}

/// Slice from the first `{` through the last `}`, if they are in order.
fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&raw[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fenced_json_with_prose() {
        let raw = "Here is the result:\n```json\n{\"score\": 3.5, \"summary\": \"ok\"}\n```";
        assert_eq!(
            parse_analysis(raw).unwrap(),
            AnalysisResult {
                score: 3.5,
                summary: "ok".to_string()
            }
        );
    }

    #[test]
    fn test_parse_integer_score() {
        let result = parse_analysis(r#"{"score": 4, "summary": "Good practices."}"#).unwrap();
        assert_eq!(result.score, 4.0);
        assert_eq!(result.summary, "Good practices.");
    }

    #[test]
    fn test_no_braces() {
        assert!(matches!(
            parse_analysis("no braces here"),
            Err(AnalysisError::NoJsonFound)
        ));
        assert!(matches!(
            parse_analysis("} backwards {"),
            Err(AnalysisError::NoJsonFound)
        ));
        assert!(matches!(
            parse_analysis("only open {"),
            Err(AnalysisError::NoJsonFound)
        ));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            parse_analysis("{score: 3, summary: ok}"),
            Err(AnalysisError::InvalidJson(_))
        ));
        // Two objects: first `{` to last `}` spans both
        assert!(matches!(
            parse_analysis(r#"{"score": 1, "summary": "a"} and {"score": 2}"#),
            Err(AnalysisError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_schema_mismatch_is_strict() {
        assert!(matches!(
            parse_analysis(r#"{"score": "high", "summary": "ok"}"#),
            Err(AnalysisError::SchemaMismatch(_))
        ));
        assert!(matches!(
            parse_analysis(r#"{"score": "4", "summary": "ok"}"#),
            Err(AnalysisError::SchemaMismatch(_))
        ));
        assert!(matches!(
            parse_analysis(r#"{"score": 4, "summary": ["ok"]}"#),
            Err(AnalysisError::SchemaMismatch(_))
        ));
        assert!(matches!(
            parse_analysis(r#"{"score": 4, "summary": "  "}"#),
            Err(AnalysisError::SchemaMismatch(_))
        ));
        assert!(matches!(
            parse_analysis(r#"{"summary": "ok"}"#),
            Err(AnalysisError::SchemaMismatch(_))
        ));
    }
}
