//! Inbound trigger and outbound response messages.

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::llm::AnalysisResult;

/// Action name of the analysis trigger.
pub const ANALYZE_PAGE: &str = "analyzePage";

/// A request to run an analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub action: String,
    /// Page to analyze; falls back to the caller's current target when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl AnalyzeRequest {
    pub fn analyze_page(target: Option<String>) -> Self {
        Self {
            action: ANALYZE_PAGE.to_string(),
            target,
        }
    }

    pub fn is_analyze_page(&self) -> bool {
        self.action == ANALYZE_PAGE
    }
}

/// The single response to an [`AnalyzeRequest`].
///
/// Serializes as `{"success": true, "score": n, "summary": s}` or
/// `{"success": false, "error": s}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalyzeResponse {
    pub fn success(result: AnalysisResult) -> Self {
        Self {
            success: true,
            score: Some(result.score),
            summary: Some(result.summary),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            score: None,
            summary: None,
            error: Some(error.into()),
        }
    }
}

impl From<Result<AnalysisResult, AnalysisError>> for AnalyzeResponse {
    fn from(outcome: Result<AnalysisResult, AnalysisError>) -> Self {
        match outcome {
            Ok(result) => Self::success(result),
            Err(e) => Self::failure(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_format() {
        let req: AnalyzeRequest = serde_json::from_str(r#"{"action":"analyzePage"}"#).unwrap();
        assert!(req.is_analyze_page());
        assert!(req.target.is_none());

        let req: AnalyzeRequest =
            serde_json::from_str(r#"{"action":"other","target":"https://x.test"}"#).unwrap();
        assert!(!req.is_analyze_page());
        assert_eq!(req.target.as_deref(), Some("https://x.test"));
    }

    #[test]
    fn test_success_wire_format() {
        let resp = AnalyzeResponse::success(AnalysisResult {
            score: 4.0,
            summary: "Good practices.".to_string(),
        });
        assert_eq!(
            serde_json::to_value(&resp).unwrap(),
            serde_json::json!({"success": true, "score": 4.0, "summary": "Good practices."})
        );
    }

    #[test]
    fn test_failure_wire_format() {
        let resp = AnalyzeResponse::from(Err(AnalysisError::NoJsonFound));
        assert_eq!(
            serde_json::to_value(&resp).unwrap(),
            serde_json::json!({"success": false, "error": "Could not find JSON object in API response"})
        );
    }
}
