//! Scoring client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the scoring API client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// API base URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Model used for scoring
    #[serde(default = "default_model")]
    pub model: String,
    /// Maximum characters of document content to embed in the prompt (0 = unlimited)
    #[serde(default = "default_max_content_chars")]
    pub max_content_chars: usize,
    /// Request timeout in seconds (unset = wait indefinitely)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_model() -> String {
    "gemini-2.0-flash-lite".to_string()
}

fn default_max_content_chars() -> usize {
    100_000
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self::base_default().with_env_overrides()
    }
}

impl ScoringConfig {
    /// Base default without env overrides.
    pub fn base_default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            max_content_chars: default_max_content_chars(),
            timeout_secs: None,
        }
    }

    /// Check if the config equals the default (for skip_serializing_if).
    pub fn is_default(&self) -> bool {
        *self == Self::base_default()
    }

    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `GEMINI_ENDPOINT`: API base URL
    /// - `GEMINI_MODEL`: Model name
    /// - `GEMINI_MAX_CONTENT_CHARS`: Max document chars to send
    /// - `GEMINI_TIMEOUT_SECS`: Request timeout
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("GEMINI_ENDPOINT") {
            if !val.is_empty() {
                self.endpoint = val;
            }
        }
        if let Ok(val) = std::env::var("GEMINI_MODEL") {
            if !val.is_empty() {
                self.model = val;
            }
        }
        if let Ok(val) = std::env::var("GEMINI_MAX_CONTENT_CHARS") {
            if let Ok(n) = val.parse() {
                self.max_content_chars = n;
            }
        }
        if let Ok(val) = std::env::var("GEMINI_TIMEOUT_SECS") {
            if let Ok(n) = val.parse() {
                self.timeout_secs = Some(n);
            }
        }
        self
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// Full `generateContent` URL for the configured model, without the key.
    pub fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
