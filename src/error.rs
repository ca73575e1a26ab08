//! Error types for the analysis pipeline.

use thiserror::Error;

/// Everything that can end an analysis early.
///
/// Every variant is terminal: the pipeline stops at the first one and reports
/// its `Display` text as the `error` field of the response.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("No active page to analyze")]
    NoActiveTarget,

    #[error("Failed to load page: {0}")]
    InjectionFailure(String),

    #[error("Could not extract text from the page. Ensure you are on the ToS or Privacy Policy page.")]
    NoExtractableText,

    #[error("API Key not configured. Please set it with `ethiscan key set`.")]
    MissingCredential,

    #[error("Could not retrieve API key from storage: {0}")]
    CredentialStore(String),

    #[error("Failed to get analysis from AI: API request failed with status {status}: {status_text}")]
    Http { status: u16, status_text: String },

    #[error("Failed to get analysis from AI: {0}")]
    Network(String),

    #[error("Failed to fetch privacy policy: {0}")]
    Fetch(String),

    #[error("Could not find JSON object in API response")]
    NoJsonFound,

    #[error("Failed to parse analysis JSON from API response: {0}")]
    InvalidJson(String),

    #[error("API response JSON format is incorrect: {0}")]
    SchemaMismatch(String),

    #[error("Could not parse analysis from API response")]
    UnexpectedResponseShape,
}

impl AnalysisError {
    /// Short machine-friendly name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::NoActiveTarget => "no_active_target",
            AnalysisError::InjectionFailure(_) => "injection_failure",
            AnalysisError::NoExtractableText => "no_extractable_text",
            AnalysisError::MissingCredential => "missing_credential",
            AnalysisError::CredentialStore(_) => "credential_store",
            AnalysisError::Http { .. } => "http_error",
            AnalysisError::Network(_) => "network",
            AnalysisError::Fetch(_) => "fetch_error",
            AnalysisError::NoJsonFound => "no_json_found",
            AnalysisError::InvalidJson(_) => "invalid_json",
            AnalysisError::SchemaMismatch(_) => "schema_mismatch",
            AnalysisError::UnexpectedResponseShape => "unexpected_response_shape",
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_message_includes_status() {
        let err = AnalysisError::Http {
            status: 500,
            status_text: "Internal Server Error".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("500"));
        assert!(msg.contains("Internal Server Error"));
        assert_eq!(err.kind(), "http_error");
    }

    #[test]
    fn test_missing_credential_points_at_cli() {
        let msg = AnalysisError::MissingCredential.to_string();
        assert!(msg.contains("ethiscan key set"));
    }
}
