//! Document locator.
//!
//! Decides what text should be scored for a page: the page itself, or the
//! privacy policy it links to when the page looks like a signup form.

mod rules;
mod text;

pub use rules::{DetectionRules, FormMarkers, LinkHeuristic, LinkMatch};
pub use text::{element_text, visible_text};

use scraper::{Html, Selector};
use serde::Serialize;
use tracing::{debug, info};
use url::Url;

/// A loaded page ready for extraction.
#[derive(Debug, Clone)]
pub struct PageSnapshot {
    /// Raw HTML of the page.
    pub html: String,
    /// URL used to resolve relative links.
    pub base_url: Option<Url>,
}

impl PageSnapshot {
    pub fn new(html: impl Into<String>, base_url: Option<Url>) -> Self {
        Self {
            html: html.into(),
            base_url,
        }
    }
}

/// Outcome of locating the document to score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionResult {
    /// The page's own visible text.
    PlainText(String),
    /// The page is a registration form; score the linked policy instead.
    RegistrationRedirect { privacy_url: String },
}

/// Wire shape of a registration redirect at the extraction boundary.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RedirectValue<'a> {
    is_registration: bool,
    privacy_url: &'a str,
}

impl ExtractionResult {
    /// Boundary representation: a plain string, or
    /// `{"isRegistration": true, "privacyUrl": ...}`.
    pub fn to_value(&self) -> serde_json::Value {
        match self {
            ExtractionResult::PlainText(text) => serde_json::Value::String(text.clone()),
            ExtractionResult::RegistrationRedirect { privacy_url } => {
                serde_json::to_value(RedirectValue {
                    is_registration: true,
                    privacy_url,
                })
                .unwrap_or(serde_json::Value::Null)
            }
        }
    }
}

/// Locate the document to score for a page.
pub fn locate(page: &PageSnapshot, heuristic: &dyn LinkHeuristic) -> ExtractionResult {
    let document = Html::parse_document(&page.html);
    let text = visible_text(&document);

    if !is_likely_registration(&document, &text, heuristic) {
        debug!("Not detected as registration page, using page text");
        return ExtractionResult::PlainText(text);
    }

    info!("Likely registration page detected");
    match find_privacy_link(&document, page.base_url.as_ref(), heuristic) {
        Some(privacy_url) => {
            info!("Using privacy policy link: {}", privacy_url);
            ExtractionResult::RegistrationRedirect { privacy_url }
        }
        None => {
            info!("No suitable privacy link found, using page text");
            ExtractionResult::PlainText(text)
        }
    }
}

/// Check form markers first, then the page text.
fn is_likely_registration(document: &Html, text: &str, heuristic: &dyn LinkHeuristic) -> bool {
    let forms = Selector::parse("form").expect("static selector should parse");
    let has_registration_form = document.select(&forms).any(|form| {
        let el = form.value();
        heuristic.is_registration_form(&FormMarkers {
            method: el.attr("method"),
            action: el.attr("action"),
            id: el.attr("id"),
        })
    });

    has_registration_form || heuristic.mentions_registration(&text.to_lowercase())
}

/// Scan links in document order for the best privacy-policy match.
fn find_privacy_link(
    document: &Html,
    base_url: Option<&Url>,
    heuristic: &dyn LinkHeuristic,
) -> Option<String> {
    let anchors = Selector::parse("a").expect("static selector should parse");
    let mut candidate: Option<String> = None;

    for link in document.select(&anchors) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let Some(url) = resolve_href(base_url, href) else {
            continue;
        };
        let url = url.to_string();
        let link_text = element_text(link).to_lowercase();

        match heuristic.classify_link(&link_text, &url.to_lowercase()) {
            LinkMatch::Exact => {
                debug!("Found 'privacy policy' text link: {}", url);
                return Some(url);
            }
            LinkMatch::Candidate if candidate.is_none() => {
                debug!("Found privacy keyword link: {}", url);
                candidate = Some(url);
            }
            _ => {}
        }
    }

    candidate
}

/// Resolve an `href` to an absolute URL.
fn resolve_href(base_url: Option<&Url>, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    match base_url {
        Some(base) => base.join(href).ok(),
        None => Url::parse(href).ok(),
    }
}
