//! Loading target pages and policy documents.
//!
//! A target is either an `http(s)` URL or a local HTML file. Loading one
//! yields a [`PageSnapshot`] for the locator; fetching a policy yields its
//! body text.

use std::fmt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{AnalysisError, Result};
use crate::http_client::HttpClient;
use crate::locator::PageSnapshot;

/// The page an analysis runs against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A page fetched over HTTP(S).
    Url(Url),
    /// A saved HTML file, with an optional URL for resolving relative links.
    File {
        path: PathBuf,
        base_url: Option<Url>,
    },
}

impl Target {
    /// Interpret a command-line target.
    ///
    /// `http://` and `https://` strings are URLs; anything else is a file path.
    pub fn parse(raw: &str, base_url: Option<Url>) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(AnalysisError::NoActiveTarget);
        }
        if raw.starts_with("http://") || raw.starts_with("https://") {
            let url = Url::parse(raw)
                .map_err(|e| AnalysisError::InjectionFailure(format!("invalid URL {raw}: {e}")))?;
            return Ok(Target::Url(url));
        }
        let expanded = shellexpand::tilde(raw);
        Ok(Target::File {
            path: PathBuf::from(expanded.as_ref()),
            base_url,
        })
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Url(url) => write!(f, "{url}"),
            Target::File { path, .. } => write!(f, "{}", path.display()),
        }
    }
}

/// Loads the page for a target.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Load the target page. `None` means nothing is selected.
    async fn load(&self, target: Option<&Target>) -> Result<PageSnapshot>;
}

/// Retrieves a linked policy document.
#[async_trait]
pub trait PolicyFetcher: Send + Sync {
    /// GET the URL and return its body text.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Page source and policy fetcher backed by the network and filesystem.
#[derive(Clone)]
pub struct LivePageSource {
    client: HttpClient,
}

impl LivePageSource {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    async fn load_url(&self, url: &Url) -> Result<PageSnapshot> {
        info!("Loading page: {}", url);
        let response = self
            .client
            .get(url.as_str())
            .await
            .map_err(|e| AnalysisError::InjectionFailure(e.to_string()))?;

        if !response.is_success() {
            return Err(AnalysisError::InjectionFailure(format!(
                "{} returned {}",
                url, response.status
            )));
        }
        if !response.is_textual() {
            warn!(
                "Page has non-text content type: {:?}",
                response.content_type()
            );
            return Err(AnalysisError::NoExtractableText);
        }

        let base_url = response.url.clone();
        let html = response
            .text()
            .await
            .map_err(|e| AnalysisError::InjectionFailure(e.to_string()))?;
        debug!("Loaded {} bytes from {}", html.len(), base_url);
        Ok(PageSnapshot::new(html, Some(base_url)))
    }

    async fn load_file(&self, path: &Path, base_url: Option<&Url>) -> Result<PageSnapshot> {
        info!("Loading page from file: {}", path.display());
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            AnalysisError::InjectionFailure(format!("{}: {}", path.display(), e))
        })?;
        let html = String::from_utf8(bytes).map_err(|_| AnalysisError::NoExtractableText)?;

        let base_url = base_url.cloned().or_else(|| file_url(path));
        Ok(PageSnapshot::new(html, base_url))
    }
}

#[async_trait]
impl PageSource for LivePageSource {
    async fn load(&self, target: Option<&Target>) -> Result<PageSnapshot> {
        match target {
            None => Err(AnalysisError::NoActiveTarget),
            Some(Target::Url(url)) => self.load_url(url).await,
            Some(Target::File { path, base_url }) => {
                self.load_file(path, base_url.as_ref()).await
            }
        }
    }
}

#[async_trait]
impl PolicyFetcher for LivePageSource {
    async fn fetch(&self, url: &str) -> Result<String> {
        info!("Fetching privacy policy from: {}", url);
        let response = self
            .client
            .get(url)
            .await
            .map_err(|e| AnalysisError::Fetch(e.to_string()))?;

        if !response.is_success() {
            return Err(AnalysisError::Fetch(format!(
                "{} {}",
                response.status.as_u16(),
                response.status_text()
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| AnalysisError::Fetch(e.to_string()))?;
        info!("Fetched privacy policy text length: {}", text.len());
        Ok(text)
    }
}

/// `file://` URL for a local path, so relative links still resolve.
fn file_url(path: &Path) -> Option<Url> {
    let absolute = std::fs::canonicalize(path).ok()?;
    Url::from_file_path(absolute).ok()
}
