//! HTTP client shared by page loading, policy fetching and the scoring API.

mod response;
mod user_agent;

pub use response::HttpResponse;
pub use user_agent::{resolve_user_agent, IMPERSONATE_USER_AGENTS, USER_AGENT};

use std::collections::HashMap;
use std::time::{Duration, Instant};

use reqwest::Client;
use serde::Serialize;
use tracing::debug;

/// Thin wrapper over `reqwest::Client` with request logging.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a client with the default user agent and no timeout.
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_user_agent(None, None)
    }

    /// Create a client with custom user agent configuration.
    /// - None: Use default ethiscan user agent
    /// - Some("impersonate"): Use random real browser user agent
    /// - Some(custom): Use custom user agent string
    pub fn with_user_agent(
        user_agent_config: Option<&str>,
        timeout: Option<Duration>,
    ) -> Result<Self, reqwest::Error> {
        let user_agent = resolve_user_agent(user_agent_config);
        let mut builder = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .brotli(true);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Make a GET request.
    pub async fn get(&self, url: &str) -> Result<HttpResponse, reqwest::Error> {
        let start = Instant::now();
        let response = self.client.get(url).send().await?;
        debug!(
            "GET {} -> {} in {}ms",
            url,
            response.status(),
            start.elapsed().as_millis()
        );
        Ok(HttpResponse::from_reqwest(response))
    }

    /// POST a JSON body.
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<HttpResponse, reqwest::Error> {
        let start = Instant::now();
        let response = self.client.post(url).json(body).send().await?;
        debug!(
            "POST {} -> {} in {}ms",
            redact_query(url),
            response.status(),
            start.elapsed().as_millis()
        );
        Ok(HttpResponse::from_reqwest(response))
    }
}

/// Drop the query string so credentials passed as parameters never hit logs.
fn redact_query(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}

pub(crate) fn collect_headers(headers: &reqwest::header::HeaderMap) -> HashMap<String, String> {
    let mut out = HashMap::new();
    for (name, value) in headers {
        if let Ok(v) = value.to_str() {
            out.insert(name.to_string(), v.to_string());
        }
    }
    out
}
