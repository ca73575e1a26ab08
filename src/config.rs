//! Configuration management.
//!
//! Config files are discovered by `prefer` (e.g. `~/.config/ethiscan/config.toml`)
//! and parsed with serde according to their extension. Every section is
//! optional; missing values fall back to defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::http_client::HttpClient;
use crate::llm::ScoringConfig;
use crate::locator::DetectionRules;
use crate::pipeline::{PipelineOptions, DEFAULT_SHORT_TEXT_WARNING};

/// Default page/policy request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT: u64 = 30;

/// Errors loading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} config {path}: {message}")]
    Parse {
        path: PathBuf,
        format: &'static str,
        message: String,
    },
}

/// Settings for page loading and policy fetching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpSettings {
    /// User agent: unset for the default, "impersonate" for a browser UA, or a custom string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            user_agent: None,
            request_timeout: default_request_timeout(),
        }
    }
}

impl HttpSettings {
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Build the client used for pages and policies.
    pub fn client(&self) -> Result<HttpClient, reqwest::Error> {
        HttpClient::with_user_agent(
            self.user_agent.as_deref(),
            Some(Duration::from_secs(self.request_timeout)),
        )
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Scoring API client.
    #[serde(default, skip_serializing_if = "ScoringConfig::is_default")]
    pub scoring: ScoringConfig,
    /// HTTP settings for pages and policies.
    #[serde(default, skip_serializing_if = "HttpSettings::is_default")]
    pub http: HttpSettings,
    /// Registration and policy-link detection keywords.
    #[serde(default, skip_serializing_if = "DetectionRules::is_default")]
    pub detection: DetectionRules,
    /// Warn when extracted text is shorter than this many characters.
    #[serde(default = "default_short_text_warning")]
    pub short_text_warning: usize,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

fn default_short_text_warning() -> usize {
    DEFAULT_SHORT_TEXT_WARNING
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            http: HttpSettings::default(),
            detection: DetectionRules::default(),
            short_text_warning: default_short_text_warning(),
            source_path: None,
        }
    }
}

impl Config {
    /// Load configuration using prefer for discovery.
    /// Falls back to defaults (with env overrides) when nothing is found or parsing fails.
    pub async fn load() -> Self {
        match prefer::load("ethiscan").await {
            Ok(pref_config) => {
                if let Some(path) = pref_config.source_path() {
                    match Self::load_from_path(path).await {
                        Ok(config) => config,
                        Err(e) => {
                            warn!("{}; using defaults", e);
                            Self::default()
                        }
                    }
                } else {
                    Self::default()
                }
            }
            Err(_) => {
                debug!("No config file found, using defaults");
                Self::default()
            }
        }
    }

    /// Load configuration from a specific file path.
    /// Supports TOML, YAML and JSON based on file extension.
    pub async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        let parse_err = |format: &'static str, message: String| ConfigError::Parse {
            path: path.to_path_buf(),
            format,
            message,
        };

        let mut config: Config = match ext {
            "toml" => toml::from_str(&contents).map_err(|e| parse_err("TOML", e.to_string()))?,
            "yaml" | "yml" => {
                serde_yaml::from_str(&contents).map_err(|e| parse_err("YAML", e.to_string()))?
            }
            _ => serde_json::from_str(&contents).map_err(|e| parse_err("JSON", e.to_string()))?,
        };

        config.source_path = Some(path.to_path_buf());
        config.scoring = config.scoring.with_env_overrides();
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Options for the analysis pipeline.
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            max_content_chars: self.scoring.max_content_chars,
            short_text_warning: self.short_text_warning,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn write_and_load(name: &str, contents: &str) -> Result<Config, ConfigError> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        Config::load_from_path(&path).await
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.short_text_warning, 100);
        assert_eq!(config.http.request_timeout, 30);
        assert!(config.http.user_agent.is_none());
        assert!(config.detection.is_default());
    }

    #[tokio::test]
    async fn test_load_toml() {
        let config = write_and_load(
            "config.toml",
            r#"
short_text_warning = 250

[http]
user_agent = "impersonate"

[detection]
link_keyword = "datenschutz"
"#,
        )
        .await
        .unwrap();

        assert_eq!(config.short_text_warning, 250);
        assert_eq!(config.http.user_agent.as_deref(), Some("impersonate"));
        assert_eq!(config.http.request_timeout, 30);
        assert_eq!(config.detection.link_keyword, "datenschutz");
        assert_eq!(config.detection.exact_link_phrase, "privacy policy");
        assert!(config.source_path.is_some());
    }

    #[tokio::test]
    async fn test_load_yaml_and_json() {
        let yaml = write_and_load("config.yaml", "http:\n  request_timeout: 5\n")
            .await
            .unwrap();
        assert_eq!(yaml.http.request_timeout, 5);

        let json = write_and_load("config.json", r#"{"short_text_warning": 10}"#)
            .await
            .unwrap();
        assert_eq!(json.short_text_warning, 10);
    }

    #[tokio::test]
    async fn test_parse_error_names_format() {
        let err = write_and_load("config.toml", "short_text_warning = [")
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { format: "TOML", .. }));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let err = Config::load_from_path(Path::new("/nonexistent/ethiscan.toml"))
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
