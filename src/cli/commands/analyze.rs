//! Analysis commands.

use tokio::io::AsyncReadExt;

use ethiscan::config::Config;
use ethiscan::pipeline::{AnalyzeRequest, AnalyzeResponse};

use crate::cli::helpers::{
    build_orchestrator, parse_target, print_detail, print_response, record_outcome,
};
use crate::cli::icons::dim_arrow;

/// Analyze a single page and print the score.
pub async fn cmd_analyze(
    mut config: Config,
    target: &str,
    base_url: Option<&str>,
    json: bool,
    model: Option<&str>,
) -> anyhow::Result<()> {
    if let Some(model) = model {
        config.scoring = config.scoring.with_model(model);
    }
    let target = parse_target(target, base_url)?;
    let orchestrator = build_orchestrator(&config)?;

    if !json {
        eprintln!("{} Analyzing {}", dim_arrow(), target);
    }

    let response: AnalyzeResponse = orchestrator.run(Some(&target)).await.into();
    record_outcome(&target.to_string(), &response).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print_response(&response);
        if response.success {
            println!();
            print_detail("Model", &config.scoring.model);
        }
    }

    if !response.success {
        std::process::exit(1);
    }
    Ok(())
}

/// Read one request from stdin and write exactly one response to stdout.
pub async fn cmd_message(
    config: &Config,
    default_target: Option<&str>,
    base_url: Option<&str>,
) -> anyhow::Result<()> {
    let mut input = String::new();
    tokio::io::stdin().read_to_string(&mut input).await?;

    let response = message_response(config, default_target, base_url, &input).await;
    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}

/// Answer a raw request. Every failure, including setup, becomes a response.
async fn message_response(
    config: &Config,
    default_target: Option<&str>,
    base_url: Option<&str>,
    input: &str,
) -> AnalyzeResponse {
    let request = match serde_json::from_str::<AnalyzeRequest>(input.trim()) {
        Ok(request) => request,
        Err(e) => return AnalyzeResponse::failure(format!("Invalid request: {}", e)),
    };

    let default_target = match default_target
        .map(|raw| parse_target(raw, base_url))
        .transpose()
    {
        Ok(target) => target,
        Err(e) => return AnalyzeResponse::failure(e.to_string()),
    };
    let orchestrator = match build_orchestrator(config) {
        Ok(orchestrator) => orchestrator,
        Err(e) => return AnalyzeResponse::failure(e.to_string()),
    };

    let response = orchestrator
        .handle(&request, default_target.as_ref())
        .await;
    if request.is_analyze_page() {
        let label = request
            .target
            .clone()
            .or_else(|| default_target.as_ref().map(|t| t.to_string()))
            .unwrap_or_default();
        record_outcome(&label, &response).await;
    }
    response
}
