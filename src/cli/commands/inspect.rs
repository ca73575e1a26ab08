//! Commands that show intermediate pipeline output without scoring.

use ethiscan::config::Config;
use ethiscan::locator::locate;
use ethiscan::page::{LivePageSource, PageSource};

use crate::cli::helpers::{build_orchestrator, parse_target};

/// Print the extraction result for a page as JSON.
pub async fn cmd_locate(
    config: &Config,
    target: &str,
    base_url: Option<&str>,
) -> anyhow::Result<()> {
    let target = parse_target(target, base_url)?;
    let pages = LivePageSource::new(config.http.client()?);

    let page = pages.load(Some(&target)).await?;
    let result = locate(&page, &config.detection);
    println!("{}", serde_json::to_string_pretty(&result.to_value())?);
    Ok(())
}

/// Print the prompt that `analyze` would send for a page.
pub async fn cmd_prompt(
    config: &Config,
    target: &str,
    base_url: Option<&str>,
) -> anyhow::Result<()> {
    let target = parse_target(target, base_url)?;
    let orchestrator = build_orchestrator(config)?;

    let document = orchestrator.locate_document(Some(&target)).await?;
    println!("{}", orchestrator.prompt_for(&document));
    Ok(())
}
