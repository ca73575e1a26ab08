//! Shared helper functions for CLI commands.

use std::sync::Arc;

use console::style;
use url::Url;

use ethiscan::config::Config;
use ethiscan::llm::{rating_label, GeminiClient};
use ethiscan::page::{LivePageSource, Target};
use ethiscan::pipeline::{AnalyzeResponse, HeuristicLocator, Orchestrator};
use ethiscan::storage::{FileCredentialStore, LastResultStore, StoredOutcome};

use super::icons::{dim_arrow, error, success, warn};

/// Parse a command-line target with an optional base URL for local files.
pub fn parse_target(raw: &str, base_url: Option<&str>) -> anyhow::Result<Target> {
    let base_url = base_url
        .map(Url::parse)
        .transpose()
        .map_err(|e| anyhow::anyhow!("Invalid --base-url: {}", e))?;
    Ok(Target::parse(raw, base_url)?)
}

/// Wire the live page source, Gemini client and stored credentials together.
pub fn build_orchestrator(config: &Config) -> anyhow::Result<Orchestrator> {
    let pages = Arc::new(LivePageSource::new(config.http.client()?));
    let scorer = Arc::new(GeminiClient::new(config.scoring.clone())?);
    let credentials = Arc::new(FileCredentialStore::default_location());
    let locator = Arc::new(HeuristicLocator::new(Arc::new(config.detection.clone())));

    Ok(Orchestrator::new(pages.clone(), pages, scorer, credentials)
        .with_locator(locator)
        .with_options(config.pipeline_options()))
}

/// Remember the outcome for `ethiscan last`. Failures only warn.
pub async fn record_outcome(target: &str, response: &AnalyzeResponse) {
    let store = LastResultStore::default_location();
    if let Err(e) = store.save(&StoredOutcome::new(target, response.clone())).await {
        tracing::warn!("Could not save last result: {}", e);
    }
}

/// Print a response for humans: score and summary, or the error.
pub fn print_response(response: &AnalyzeResponse) {
    if !response.success {
        eprintln!(
            "{} {}",
            error(),
            response.error.as_deref().unwrap_or("Analysis failed")
        );
        return;
    }

    let score = response.score.unwrap_or_default();
    println!(
        "{} Privacy score: {}/5 ({})",
        success(),
        style(score).bold(),
        rating_label(score)
    );
    match response.summary.as_deref() {
        Some(summary) => println!("\n{}", summary),
        None => eprintln!("{} No summary returned", warn()),
    }
}

/// Print a secondary detail line.
pub fn print_detail(label: &str, value: impl std::fmt::Display) {
    println!("  {} {}: {}", dim_arrow(), label, value);
}
