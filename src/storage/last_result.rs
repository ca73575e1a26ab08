//! The most recent analysis outcome.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{data_dir, read_optional, write_file, StorageError};
use crate::llm::RUBRIC_VERSION;
use crate::pipeline::AnalyzeResponse;

const LAST_RESULT_FILE: &str = "last_analysis.json";

/// A response together with what produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredOutcome {
    pub target: String,
    pub analyzed_at: DateTime<Utc>,
    /// Rubric the score was produced with; empty for outcomes saved before it was recorded.
    #[serde(default)]
    pub rubric_version: String,
    pub response: AnalyzeResponse,
}

impl StoredOutcome {
    pub fn new(target: impl Into<String>, response: AnalyzeResponse) -> Self {
        Self {
            target: target.into(),
            analyzed_at: Utc::now(),
            rubric_version: RUBRIC_VERSION.to_string(),
            response,
        }
    }
}

/// Single-slot JSON file holding the latest outcome.
#[derive(Debug, Clone)]
pub struct LastResultStore {
    path: PathBuf,
}

impl LastResultStore {
    pub fn default_location() -> Self {
        Self::at(data_dir().join(LAST_RESULT_FILE))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the stored outcome.
    pub async fn save(&self, outcome: &StoredOutcome) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(outcome)
            .map_err(|e| StorageError::Serialize(e.to_string()))?;
        write_file(&self.path, &json).await
    }

    pub async fn load(&self) -> Result<Option<StoredOutcome>, StorageError> {
        let Some(contents) = read_optional(&self.path).await? else {
            return Ok(None);
        };
        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|e| StorageError::Parse {
                path: self.path.clone(),
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::AnalysisResult;

    #[tokio::test]
    async fn test_only_latest_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let store = LastResultStore::at(dir.path().join("last.json"));
        assert!(store.load().await.unwrap().is_none());

        let first = StoredOutcome::new("https://a.test", AnalyzeResponse::failure("boom"));
        store.save(&first).await.unwrap();

        let second = StoredOutcome::new(
            "https://b.test",
            AnalyzeResponse::success(AnalysisResult {
                score: 2.5,
                summary: "Meh.".to_string(),
            }),
        );
        store.save(&second).await.unwrap();

        assert_eq!(store.load().await.unwrap(), Some(second));
    }

    #[tokio::test]
    async fn test_rubric_version_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let store = LastResultStore::at(dir.path().join("last.json"));
        store
            .save(&StoredOutcome::new("https://a.test", AnalyzeResponse::failure("x")))
            .await
            .unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["rubric_version"], RUBRIC_VERSION);

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded.rubric_version, RUBRIC_VERSION);
    }

    #[tokio::test]
    async fn test_outcome_without_rubric_version_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("last.json");
        std::fs::write(
            &path,
            r#"{"target":"t","analyzed_at":"2025-01-01T00:00:00Z","response":{"success":false,"error":"e"}}"#,
        )
        .unwrap();
        let loaded = LastResultStore::at(path).load().await.unwrap().unwrap();
        assert_eq!(loaded.rubric_version, "");
    }
}
