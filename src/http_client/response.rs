//! HTTP response wrapper.

use std::collections::HashMap;

use reqwest::{Response, StatusCode};
use url::Url;

use super::collect_headers;

/// HTTP response wrapper.
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HashMap<String, String>,
    /// Final URL after redirects.
    pub url: Url,
    response: Response,
}

impl HttpResponse {
    pub(crate) fn from_reqwest(response: Response) -> Self {
        Self {
            status: response.status(),
            headers: collect_headers(response.headers()),
            url: response.url().clone(),
            response,
        }
    }

    /// Check if the response is successful.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Reason phrase for the status code, e.g. "Not Found".
    pub fn status_text(&self) -> String {
        self.status
            .canonical_reason()
            .unwrap_or_default()
            .to_string()
    }

    /// Get the Content-Type header.
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get("content-type").map(|s| s.as_str())
    }

    /// Whether the body is something we can read as text.
    ///
    /// A missing Content-Type is given the benefit of the doubt.
    pub fn is_textual(&self) -> bool {
        match self.content_type() {
            None => true,
            Some(ct) => {
                let ct = ct.to_ascii_lowercase();
                ct.starts_with("text/")
                    || ct.contains("html")
                    || ct.contains("xml")
                    || ct.contains("json")
            }
        }
    }

    /// Get response body as text.
    pub async fn text(self) -> Result<String, reqwest::Error> {
        self.response.text().await
    }
}
