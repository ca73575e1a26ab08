//! Gemini client for policy scoring.
//!
//! One POST to `generateContent` per analysis. No retries.

mod config;
mod prompts;

pub use config::ScoringConfig;
pub use prompts::{build_prompt, rating_label, OUTPUT_INSTRUCTION, RUBRIC_VERSION, SCORING_RUBRIC};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};
use url::Url;

use crate::error::{AnalysisError, Result};
use crate::http_client::HttpClient;

/// Something that turns a prompt into generated text.
#[async_trait]
pub trait ScoringBackend: Send + Sync {
    /// Send the prompt and return the model's raw generated text.
    async fn score(&self, prompt: &str, api_key: Option<&str>) -> Result<String>;
}

/// Gemini `generateContent` request body.
#[derive(Debug, Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    parts: Option<Vec<GeminiResponsePart>>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    text: Option<String>,
}

impl GeminiResponse {
    /// `candidates[0].content.parts[0].text`, if present and non-empty.
    fn into_text(self) -> Option<String> {
        self.candidates?
            .into_iter()
            .next()?
            .content?
            .parts?
            .into_iter()
            .next()?
            .text
            .filter(|t| !t.is_empty())
    }
}

/// Scoring client for the Gemini API.
pub struct GeminiClient {
    config: ScoringConfig,
    client: HttpClient,
}

impl GeminiClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ScoringConfig) -> Result<Self> {
        let client = HttpClient::with_user_agent(None, config.timeout())
            .map_err(|e| AnalysisError::Network(e.to_string()))?;
        Ok(Self { config, client })
    }

    /// Get the config.
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }
}

#[async_trait]
impl ScoringBackend for GeminiClient {
    async fn score(&self, prompt: &str, api_key: Option<&str>) -> Result<String> {
        let api_key = match api_key {
            Some(key) if !key.trim().is_empty() => key,
            _ => {
                error!("Gemini API key not configured");
                return Err(AnalysisError::MissingCredential);
            }
        };

        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt }],
            }],
        };
        let mut url = Url::parse(&self.config.generate_url())
            .map_err(|e| AnalysisError::Network(format!("invalid scoring endpoint: {}", e)))?;
        url.query_pairs_mut().append_pair("key", api_key);

        info!("Calling Gemini API (model: {})", self.config.model);
        // reqwest errors embed the request URL, which carries the key
        let response = self
            .client
            .post_json(url.as_str(), &request)
            .await
            .map_err(|e| AnalysisError::Network(e.without_url().to_string()))?;

        if !response.is_success() {
            let status = response.status.as_u16();
            let status_text = response.status_text();
            let body = response.text().await.unwrap_or_default();
            error!("Gemini API error response ({}): {}", status, body);
            return Err(AnalysisError::Http {
                status,
                status_text,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| AnalysisError::Network(e.without_url().to_string()))?;
        let parsed: GeminiResponse = serde_json::from_str(&body).map_err(|e| {
            error!("Gemini response is not valid JSON: {}", e);
            AnalysisError::UnexpectedResponseShape
        })?;

        let text = parsed.into_text().ok_or_else(|| {
            error!("Unexpected API response structure: {}", body);
            AnalysisError::UnexpectedResponseShape
        })?;

        debug!("Received {} chars of generated text", text.len());
        Ok(text)
    }
}

/// Truncate content to a maximum byte length (UTF-8 safe). Zero means no limit.
pub fn truncate_content(text: &str, max_chars: usize) -> &str {
    if max_chars == 0 || text.len() <= max_chars {
        return text;
    }
    let mut end = max_chars;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: "hello" }],
            }],
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"contents": [{"parts": [{"text": "hello"}]}]})
        );
    }

    #[test]
    fn test_response_text_extraction() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"{\"score\":3}"}],"role":"model"}}]}"#;
        let parsed: GeminiResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.into_text().as_deref(), Some("{\"score\":3}"));

        for body in [
            r#"{}"#,
            r#"{"candidates":[]}"#,
            r#"{"candidates":[{}]}"#,
            r#"{"candidates":[{"content":{"parts":[]}}]}"#,
            r#"{"candidates":[{"content":{"parts":[{"text":""}]}}]}"#,
        ] {
            let parsed: GeminiResponse = serde_json::from_str(body).unwrap();
            assert!(parsed.into_text().is_none(), "expected no text for {body}");
        }
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_request() {
        let client = GeminiClient::new(
            ScoringConfig::base_default().with_endpoint("http://127.0.0.1:9"),
        )
        .unwrap();

        for key in [None, Some(""), Some("   ")] {
            let err = client.score("prompt", key).await.unwrap_err();
            assert!(matches!(err, AnalysisError::MissingCredential));
        }
    }

    #[test]
    fn test_truncate_content() {
        assert_eq!(truncate_content("hello", 0), "hello");
        assert_eq!(truncate_content("hello", 10), "hello");
        assert_eq!(truncate_content("hello", 3), "hel");
        // 'é' is two bytes; never split it
        assert_eq!(truncate_content("héllo", 2), "h");
    }
}
