//! Matching rules for registration pages and privacy-policy links.

use serde::{Deserialize, Serialize};

/// Attributes of a `<form>` element relevant to registration detection.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormMarkers<'a> {
    pub method: Option<&'a str>,
    pub action: Option<&'a str>,
    pub id: Option<&'a str>,
}

/// How well a link matches the privacy-policy heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkMatch {
    /// Not a privacy link.
    None,
    /// Generic privacy link; keep scanning for something better.
    Candidate,
    /// Link text names the privacy policy; stop scanning.
    Exact,
}

/// Strategy used by the locator to classify forms, page text and links.
///
/// Inputs for text and URLs are already lower-cased.
pub trait LinkHeuristic: Send + Sync {
    /// Whether a form looks like an account-creation form.
    fn is_registration_form(&self, form: &FormMarkers<'_>) -> bool;

    /// Whether the page text mentions account creation.
    fn mentions_registration(&self, page_text: &str) -> bool;

    /// Classify a single hyperlink.
    fn classify_link(&self, link_text: &str, link_url: &str) -> LinkMatch;
}

/// Keyword-based detection rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionRules {
    /// Substrings of a form's `action` or `id` that mark it as registration.
    #[serde(default = "default_form_markers")]
    pub form_markers: Vec<String>,
    /// Phrases in the page text that mark it as registration.
    #[serde(default = "default_registration_phrases")]
    pub registration_phrases: Vec<String>,
    /// Link text that wins immediately.
    #[serde(default = "default_exact_link_phrase")]
    pub exact_link_phrase: String,
    /// Keyword in link text or URL accepted as a fallback.
    #[serde(default = "default_link_keyword")]
    pub link_keyword: String,
}

fn default_form_markers() -> Vec<String> {
    vec!["register".to_string(), "signup".to_string()]
}

fn default_registration_phrases() -> Vec<String> {
    vec!["create account".to_string(), "sign up".to_string()]
}

fn default_exact_link_phrase() -> String {
    "privacy policy".to_string()
}

fn default_link_keyword() -> String {
    "privacy".to_string()
}

impl Default for DetectionRules {
    fn default() -> Self {
        Self {
            form_markers: default_form_markers(),
            registration_phrases: default_registration_phrases(),
            exact_link_phrase: default_exact_link_phrase(),
            link_keyword: default_link_keyword(),
        }
    }
}

impl DetectionRules {
    /// Check if the rules equal the defaults (for skip_serializing_if).
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    fn attr_has_marker(&self, value: Option<&str>) -> bool {
        let Some(value) = value else {
            return false;
        };
        let value = value.to_lowercase();
        self.form_markers
            .iter()
            .any(|marker| value.contains(marker.as_str()))
    }
}

impl LinkHeuristic for DetectionRules {
    fn is_registration_form(&self, form: &FormMarkers<'_>) -> bool {
        let is_post = form
            .method
            .is_some_and(|m| m.trim().eq_ignore_ascii_case("post"));
        is_post || self.attr_has_marker(form.action) || self.attr_has_marker(form.id)
    }

    fn mentions_registration(&self, page_text: &str) -> bool {
        self.registration_phrases
            .iter()
            .any(|phrase| page_text.contains(phrase.as_str()))
    }

    fn classify_link(&self, link_text: &str, link_url: &str) -> LinkMatch {
        if link_text.contains(self.exact_link_phrase.as_str()) {
            LinkMatch::Exact
        } else if link_text.contains(self.link_keyword.as_str())
            || link_url.contains(self.link_keyword.as_str())
        {
            LinkMatch::Candidate
        } else {
            LinkMatch::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_form_is_registration() {
        let rules = DetectionRules::default();
        let form = FormMarkers {
            method: Some("POST"),
            ..Default::default()
        };
        assert!(rules.is_registration_form(&form));
    }

    #[test]
    fn test_form_markers_in_action_and_id() {
        let rules = DetectionRules::default();
        assert!(rules.is_registration_form(&FormMarkers {
            method: Some("get"),
            action: Some("/account/register"),
            id: None,
        }));
        assert!(rules.is_registration_form(&FormMarkers {
            method: None,
            action: None,
            id: Some("signup-form"),
        }));
        assert!(!rules.is_registration_form(&FormMarkers {
            method: Some("get"),
            action: Some("/search"),
            id: Some("q"),
        }));
    }

    #[test]
    fn test_registration_phrases() {
        let rules = DetectionRules::default();
        assert!(rules.mentions_registration("welcome! create account to continue"));
        assert!(rules.mentions_registration("sign up today"));
        assert!(!rules.mentions_registration("log in"));
    }

    #[test]
    fn test_classify_link() {
        let rules = DetectionRules::default();
        assert_eq!(
            rules.classify_link("read our privacy policy", "https://x.test/legal"),
            LinkMatch::Exact
        );
        assert_eq!(
            rules.classify_link("privacy", "https://x.test/legal"),
            LinkMatch::Candidate
        );
        assert_eq!(
            rules.classify_link("legal", "https://x.test/privacy"),
            LinkMatch::Candidate
        );
        assert_eq!(
            rules.classify_link("terms", "https://x.test/terms"),
            LinkMatch::None
        );
    }

    #[test]
    fn test_rules_deserialize_with_defaults() {
        let rules: DetectionRules = toml::from_str(r#"link_keyword = "datenschutz""#).unwrap();
        assert_eq!(rules.link_keyword, "datenschutz");
        assert_eq!(rules.exact_link_phrase, "privacy policy");
        assert!(!rules.is_default());
    }
}
